//! Public program catalogue.

use moveminds_dto::{DifficultyLevel, Enrollment, Page, Program, ProgramDraft};

use crate::api::{ApiClient, ProgramQuery};
use crate::collection::{
    CollectionSource, FilterSet, FilterState, RemoteCollection, same_text, search_matches,
};
use crate::error::{MoveMindsError, Result};
use crate::forms::{FormValues, program_form};
use crate::notices::Notices;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFilter {
    pub category: Option<String>,
    pub difficulty: Option<DifficultyLevel>,
}

impl FilterSet<Program> for ProgramFilter {
    fn matches(&self, program: &Program, search: &str) -> bool {
        self.category.as_deref().is_none_or(|wanted| {
            program
                .category
                .as_deref()
                .is_some_and(|c| same_text(c, wanted))
        }) && self
            .difficulty
            .is_none_or(|d| program.difficulty_level == d)
            && search_matches(
                search,
                &[
                    Some(&program.name),
                    program.description.as_deref(),
                    program.instructor_name.as_deref(),
                ],
            )
    }
}

pub struct CatalogueSource {
    api: ApiClient,
}

impl CollectionSource for CatalogueSource {
    type Item = Program;
    type Filter = ProgramFilter;

    async fn fetch(&self, request: &FilterState<ProgramFilter>) -> Result<Page<Program>> {
        self.api
            .programs(&ProgramQuery {
                page: request.current_page,
                size: request.page_size,
                search: super::search_param(&request.search_term),
                category: request.filters.category.clone(),
                difficulty: request.filters.difficulty,
            })
            .await
    }
}

/// Display-ready summary of a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramCard {
    pub id: i64,
    pub name: String,
    pub instructor: String,
    pub category: String,
    pub difficulty: &'static str,
    pub price: String,
    pub duration: Option<String>,
}

impl From<&Program> for ProgramCard {
    fn from(program: &Program) -> Self {
        Self {
            id: program.id,
            name: program.name.clone(),
            instructor: program
                .instructor_name
                .clone()
                .unwrap_or_else(|| "Unknown instructor".to_string()),
            category: program.category.clone().unwrap_or_default(),
            difficulty: program.difficulty_level.label(),
            price: price_label(program.price),
            duration: program.duration_weeks.map(|w| match w {
                1 => "1 week".to_string(),
                n => format!("{n} weeks"),
            }),
        }
    }
}

/// "Free" for zero, otherwise LKR with thousands separators and two decimals.
pub fn price_label(price: f64) -> String {
    if price <= 0.0 {
        return "Free".to_string();
    }
    let cents = (price * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("LKR {grouped}.{:02}", cents % 100)
}

/// Turn a validated program form into the request body.
pub fn program_draft(values: &FormValues) -> Result<ProgramDraft> {
    program_form().validate(values)?;
    let number = |field: &str| values.text(field).and_then(|v| v.parse::<f64>().ok());
    let id = |field: &str| values.text(field).and_then(|v| v.parse::<i64>().ok());
    let difficulty_level = values
        .text("difficultyLevel")
        .unwrap_or_default()
        .parse::<DifficultyLevel>()?;
    Ok(ProgramDraft {
        name: values.text("name").unwrap_or_default(),
        description: values.text("description").unwrap_or_default(),
        category_id: id("categoryId"),
        difficulty_level,
        price: number("price").unwrap_or_default(),
        duration_weeks: number("durationWeeks").map(|w| w as u32),
        location_id: id("locationId"),
    })
}

pub struct CatalogueView {
    api: ApiClient,
    programs: RemoteCollection<CatalogueSource>,
}

impl CatalogueView {
    pub fn new(api: ApiClient, page_size: usize, notices: Notices) -> Self {
        let source = CatalogueSource { api: api.clone() };
        Self {
            api,
            programs: RemoteCollection::with_notices(source, page_size, notices),
        }
    }

    pub fn programs(&self) -> &RemoteCollection<CatalogueSource> {
        &self.programs
    }

    pub fn cards(&self) -> Vec<ProgramCard> {
        self.programs
            .items()
            .iter()
            .map(|p| ProgramCard::from(p.as_ref()))
            .collect()
    }

    pub async fn details(&self, program_id: i64) -> Result<Program> {
        match self.api.program(program_id).await {
            Err(MoveMindsError::Api { status: 404, .. }) => {
                Err(MoveMindsError::NotFound(format!("program {program_id}")))
            }
            other => other,
        }
    }

    pub async fn enroll(&self, program_id: i64) -> Result<Enrollment> {
        let enrollment = self.api.enroll(program_id).await?;
        self.programs.notices().success(format!(
            "Enrolled in {}",
            enrollment
                .program_name
                .as_deref()
                .unwrap_or("the program")
        ));
        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(price: f64) -> Program {
        Program {
            id: 4,
            name: "Strength Foundations".to_string(),
            description: Some("Barbell basics".to_string()),
            category: Some("Strength".to_string()),
            difficulty_level: DifficultyLevel::Beginner,
            price,
            duration_weeks: Some(8),
            instructor_id: Some(2),
            instructor_name: Some("Nuwan Silva".to_string()),
            is_active: true,
            image_url: None,
            location: None,
        }
    }

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(0.0), "Free");
        assert_eq!(price_label(1500.0), "LKR 1,500.00");
        assert_eq!(price_label(999.5), "LKR 999.50");
        assert_eq!(price_label(1234567.891), "LKR 1,234,567.89");
    }

    #[test]
    fn test_card_for_free_beginner_program() {
        let card = ProgramCard::from(&program(0.0));
        assert_eq!(card.price, "Free");
        assert_eq!(card.difficulty, "Beginner");
        assert_eq!(card.duration.as_deref(), Some("8 weeks"));
        assert_eq!(card.instructor, "Nuwan Silva");
    }

    #[test]
    fn test_filter_category_is_case_insensitive() {
        let filter = ProgramFilter {
            category: Some("strength".to_string()),
            difficulty: Some(DifficultyLevel::Beginner),
        };
        assert!(filter.matches(&program(0.0), "barbell"));
        assert!(!filter.matches(&program(0.0), "yoga"));
        let advanced = ProgramFilter {
            difficulty: Some(DifficultyLevel::Advanced),
            ..Default::default()
        };
        assert!(!advanced.matches(&program(0.0), ""));
    }

    #[test]
    fn test_program_draft_from_form() {
        let values = FormValues::new()
            .with("name", "Couch to 5K")
            .with("description", "Nine weeks from the sofa to a 5K run.")
            .with("price", "2500")
            .with("durationWeeks", "9")
            .with("difficultyLevel", "beginner")
            .with("categoryId", "3");
        let draft = program_draft(&values).unwrap();
        assert_eq!(draft.difficulty_level, DifficultyLevel::Beginner);
        assert_eq!(draft.price, 2500.0);
        assert_eq!(draft.duration_weeks, Some(9));
        assert_eq!(draft.category_id, Some(3));
        assert_eq!(draft.location_id, None);

        let invalid = values.with("price", "-10");
        assert!(matches!(
            program_draft(&invalid),
            Err(MoveMindsError::Validation(_))
        ));
    }
}
