//! Program content: modules, their lessons and lesson resources.

use std::path::Path;

use moveminds_dto::{Lesson, LessonDraft, ModuleDraft, ProgramModule, Resource};

use crate::api::ApiClient;
use crate::error::{MoveMindsError, Result};
use crate::forms::{FormValues, lesson_form, module_form};
use crate::notices::Notices;

/// Modules in `order_index` order, each with ordered lessons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTree {
    pub program_id: i64,
    pub modules: Vec<ProgramModule>,
}

impl ContentTree {
    pub fn new(program_id: i64, mut modules: Vec<ProgramModule>) -> Self {
        for module in &mut modules {
            module.lessons.sort_by_key(|l| (l.order_index, l.id));
        }
        modules.sort_by_key(|m| (m.order_index, m.id));
        Self {
            program_id,
            modules,
        }
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn module(&self, module_id: i64) -> Option<&ProgramModule> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    fn module_mut(&mut self, module_id: i64) -> Result<&mut ProgramModule> {
        self.modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or_else(|| MoveMindsError::NotFound(format!("module {module_id}")))
    }

    fn lesson_mut(&mut self, lesson_id: i64) -> Result<&mut Lesson> {
        self.modules
            .iter_mut()
            .flat_map(|m| m.lessons.iter_mut())
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| MoveMindsError::NotFound(format!("lesson {lesson_id}")))
    }

    /// Order index for a module appended at the end.
    pub fn next_module_index(&self) -> u32 {
        self.modules
            .iter()
            .map(|m| m.order_index + 1)
            .max()
            .unwrap_or(0)
    }

    fn upsert_module(&mut self, module: ProgramModule) {
        match self.modules.iter_mut().find(|m| m.id == module.id) {
            Some(existing) => {
                let lessons = std::mem::take(&mut existing.lessons);
                *existing = ProgramModule { lessons, ..module };
            }
            None => self.modules.push(module),
        }
        self.modules.sort_by_key(|m| (m.order_index, m.id));
    }

    fn upsert_lesson(&mut self, lesson: Lesson) -> Result<()> {
        let module = self.module_mut(lesson.module_id)?;
        match module.lessons.iter_mut().find(|l| l.id == lesson.id) {
            Some(existing) => {
                let resources = std::mem::take(&mut existing.resources);
                *existing = Lesson { resources, ..lesson };
            }
            None => module.lessons.push(lesson),
        }
        module.lessons.sort_by_key(|l| (l.order_index, l.id));
        Ok(())
    }
}

fn order_index(values: &FormValues) -> Option<u32> {
    values
        .text("orderIndex")
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v as u32)
}

pub struct ContentEditor {
    api: ApiClient,
    notices: Notices,
    tree: ContentTree,
}

impl ContentEditor {
    pub async fn load(api: ApiClient, program_id: i64, notices: Notices) -> Result<Self> {
        let modules = api.program_modules(program_id).await?;
        Ok(Self {
            api,
            notices,
            tree: ContentTree::new(program_id, modules),
        })
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub async fn add_module(&mut self, values: &FormValues) -> Result<&ProgramModule> {
        module_form().validate(values)?;
        let draft = ModuleDraft {
            program_id: self.tree.program_id,
            title: values.text("title").unwrap_or_default(),
            description: values.text("description"),
            order_index: order_index(values).unwrap_or_else(|| self.tree.next_module_index()),
        };
        let module = self.api.create_module(&draft).await?;
        let id = module.id;
        self.tree.upsert_module(module);
        self.notices.success("Module added");
        self.tree
            .module(id)
            .ok_or_else(|| MoveMindsError::NotFound(format!("module {id}")))
    }

    pub async fn update_module(&mut self, module_id: i64, values: &FormValues) -> Result<()> {
        module_form().validate(values)?;
        let current = self
            .tree
            .module(module_id)
            .ok_or_else(|| MoveMindsError::NotFound(format!("module {module_id}")))?;
        let draft = ModuleDraft {
            program_id: self.tree.program_id,
            title: values.text("title").unwrap_or_default(),
            description: values.text("description"),
            order_index: order_index(values).unwrap_or(current.order_index),
        };
        let module = self.api.update_module(module_id, &draft).await?;
        self.tree.upsert_module(module);
        self.notices.success("Module updated");
        Ok(())
    }

    pub async fn delete_module(&mut self, module_id: i64) -> Result<()> {
        self.api.delete_module(module_id).await?;
        self.tree.modules.retain(|m| m.id != module_id);
        self.notices.success("Module deleted");
        Ok(())
    }

    pub async fn add_lesson(&mut self, module_id: i64, values: &FormValues) -> Result<()> {
        lesson_form().validate(values)?;
        let next_index = self
            .tree
            .module_mut(module_id)?
            .lessons
            .iter()
            .map(|l| l.order_index + 1)
            .max()
            .unwrap_or(0);
        let draft = LessonDraft {
            module_id,
            title: values.text("title").unwrap_or_default(),
            content: values.text("content"),
            video_url: values.text("videoUrl"),
            order_index: order_index(values).unwrap_or(next_index),
        };
        let lesson = self.api.create_lesson(&draft).await?;
        self.tree.upsert_lesson(lesson)?;
        self.notices.success("Lesson added");
        Ok(())
    }

    pub async fn update_lesson(&mut self, lesson_id: i64, values: &FormValues) -> Result<()> {
        lesson_form().validate(values)?;
        let current = self.tree.lesson_mut(lesson_id)?;
        let draft = LessonDraft {
            module_id: current.module_id,
            title: values.text("title").unwrap_or_default(),
            content: values.text("content"),
            video_url: values.text("videoUrl"),
            order_index: order_index(values).unwrap_or(current.order_index),
        };
        let lesson = self.api.update_lesson(lesson_id, &draft).await?;
        self.tree.upsert_lesson(lesson)?;
        self.notices.success("Lesson updated");
        Ok(())
    }

    pub async fn delete_lesson(&mut self, lesson_id: i64) -> Result<()> {
        self.api.delete_lesson(lesson_id).await?;
        for module in &mut self.tree.modules {
            module.lessons.retain(|l| l.id != lesson_id);
        }
        self.notices.success("Lesson deleted");
        Ok(())
    }

    pub async fn upload_resource(
        &mut self,
        lesson_id: i64,
        title: &str,
        path: &Path,
    ) -> Result<Resource> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                MoveMindsError::InvalidArgument(format!("not a file: {}", path.display()))
            })?
            .to_string();
        // Fail before reading the file if the lesson is unknown.
        self.tree.lesson_mut(lesson_id)?;
        let bytes = tokio::fs::read(path).await?;
        let resource = self
            .api
            .upload_resource(lesson_id, title, &file_name, bytes)
            .await?;
        self.tree
            .lesson_mut(lesson_id)?
            .resources
            .push(resource.clone());
        self.notices.success(format!("Uploaded {file_name}"));
        Ok(resource)
    }

    pub async fn delete_resource(&mut self, resource_id: i64) -> Result<()> {
        self.api.delete_resource(resource_id).await?;
        for lesson in self
            .tree
            .modules
            .iter_mut()
            .flat_map(|m| m.lessons.iter_mut())
        {
            lesson.resources.retain(|r| r.id != resource_id);
        }
        self.notices.success("Resource deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: i64, module_id: i64, order_index: u32) -> Lesson {
        Lesson {
            id,
            module_id,
            title: format!("Lesson {id}"),
            content: None,
            video_url: None,
            order_index,
            resources: Vec::new(),
        }
    }

    fn module(id: i64, order_index: u32, lessons: Vec<Lesson>) -> ProgramModule {
        ProgramModule {
            id,
            program_id: 1,
            title: format!("Module {id}"),
            description: None,
            order_index,
            lessons,
        }
    }

    #[test]
    fn test_tree_orders_by_order_index() {
        let tree = ContentTree::new(
            1,
            vec![
                module(10, 2, vec![]),
                module(11, 0, vec![lesson(3, 11, 1), lesson(4, 11, 0)]),
                module(12, 1, vec![]),
            ],
        );
        let ids: Vec<i64> = tree.modules.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![11, 12, 10]);
        let lesson_ids: Vec<i64> = tree.modules[0].lessons.iter().map(|l| l.id).collect();
        assert_eq!(lesson_ids, vec![4, 3]);
        assert_eq!(tree.next_module_index(), 3);
        assert_eq!(tree.lesson_count(), 2);
    }

    #[test]
    fn test_upsert_keeps_children() {
        let mut tree = ContentTree::new(1, vec![module(10, 0, vec![lesson(1, 10, 0)])]);
        tree.upsert_module(ProgramModule {
            title: "Renamed".to_string(),
            ..module(10, 5, vec![])
        });
        let updated = tree.module(10).unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.lessons.len(), 1);

        tree.upsert_lesson(lesson(2, 10, 0)).unwrap();
        assert_eq!(tree.module(10).unwrap().lessons.len(), 2);
        assert!(tree.upsert_lesson(lesson(3, 99, 0)).is_err());
    }
}
