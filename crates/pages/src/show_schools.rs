use api_client::{ApiError, SchoolsApi};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use core_types::School;

pub const FETCH_FAILED: &str = "Failed to fetch schools";

/// Cards per grid row.
const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingState {
    Loading,
    Loaded(Vec<School>),
    Error(String),
}

/// The school listing.
#[derive(Debug, Clone)]
pub struct ShowSchoolsPage {
    state: ListingState,
}

impl Default for ShowSchoolsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowSchoolsPage {
    /// A page starts out loading.
    pub fn new() -> Self {
        Self {
            state: ListingState::Loading,
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Fetches the listing and settles in `Loaded` or `Error`.
    pub async fn load(&mut self, api: &dyn SchoolsApi) -> &ListingState {
        self.state = ListingState::Loading;
        self.state = match api.list_schools().await {
            Ok(schools) => {
                tracing::debug!(count = schools.len(), "Schools loaded.");
                ListingState::Loaded(schools)
            }
            Err(ApiError::Rejected { status, .. }) => {
                tracing::warn!(status, "Listing request was rejected.");
                ListingState::Error(FETCH_FAILED.to_string())
            }
            Err(e) => ListingState::Error(e.to_string()),
        };
        &self.state
    }

    /// The manual "Try Again": reloads only from `Error`. Returns whether a
    /// reload happened.
    pub async fn retry(&mut self, api: &dyn SchoolsApi) -> bool {
        if !matches!(self.state, ListingState::Error(_)) {
            return false;
        }
        self.load(api).await;
        true
    }

    pub fn render(&self) -> String {
        match &self.state {
            ListingState::Loading => "Loading schools...\n".to_string(),
            ListingState::Error(message) => {
                format!("Error Loading Schools\n{message}\n[ Try Again ]\n")
            }
            ListingState::Loaded(schools) if schools.is_empty() => concat!(
                "No Schools Found\n",
                "There are no schools registered in the system yet.\n",
                "[ Add First School ]\n"
            )
            .to_string(),
            ListingState::Loaded(schools) => render_grid(schools),
        }
    }
}

fn card(school: &School) -> String {
    let image = match &school.image {
        Some(location) => format!("[image] {location}"),
        None => "[ no image ]".to_string(),
    };
    format!(
        "{image}\n{}\n{}\n{}, {}\nTel: {}\nEmail: {}",
        school.name, school.address, school.city, school.state, school.contact, school.email_id
    )
}

fn render_grid(schools: &[School]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled);

    for row in schools.chunks(GRID_COLUMNS) {
        table.add_row(row.iter().map(card).collect::<Vec<_>>());
    }

    let noun = if schools.len() == 1 { "school" } else { "schools" };
    format!("All Schools ({} {noun})\n{table}\n", schools.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedApi, school};

    #[tokio::test]
    async fn loads_and_renders_one_card_per_school() {
        let api = ScriptedApi::accepting().with_schools(vec![
            school(1, "Lincoln High", Some("https://assets.test/v1/lincoln.jpg")),
            school(2, "Jefferson Middle", None),
            school(3, "Adams Elementary", None),
            school(4, "Madison Prep", None),
        ]);
        let mut page = ShowSchoolsPage::new();
        assert_eq!(page.state(), &ListingState::Loading);
        assert_eq!(page.render(), "Loading schools...\n");

        page.load(&api).await;
        let ListingState::Loaded(schools) = page.state() else {
            panic!("expected loaded state");
        };
        assert_eq!(schools.len(), 4);

        let view = page.render();
        assert!(view.starts_with("All Schools (4 schools)"));
        for name in ["Lincoln High", "Jefferson Middle", "Adams Elementary", "Madison Prep"] {
            assert!(view.contains(name), "missing {name}");
        }
        assert!(view.contains("[image] https://assets.test/v1/lincoln.jpg"));
        assert_eq!(view.matches("[ no image ]").count(), 3);
        assert!(view.contains("Springfield, IL"));
    }

    #[tokio::test]
    async fn empty_listing_prompts_to_add_one() {
        let api = ScriptedApi::accepting();
        let mut page = ShowSchoolsPage::new();
        assert_eq!(page.load(&api).await, &ListingState::Loaded(Vec::new()));
        assert!(page.render().contains("No Schools Found"));
        assert!(page.render().contains("[ Add First School ]"));
    }

    #[tokio::test]
    async fn rejected_listing_shows_a_generic_error_and_can_retry() {
        let api = ScriptedApi::rejecting(500, Some("Internal server error"))
            .failing_lists(1)
            .with_schools(vec![school(1, "Lincoln High", None)]);
        let mut page = ShowSchoolsPage::new();

        page.load(&api).await;
        assert_eq!(page.state(), &ListingState::Error(FETCH_FAILED.to_string()));
        assert!(page.render().contains("[ Try Again ]"));

        assert!(page.retry(&api).await);
        assert!(matches!(page.state(), ListingState::Loaded(s) if s.len() == 1));
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn retry_is_a_no_op_unless_in_error() {
        let api = ScriptedApi::accepting();
        let mut page = ShowSchoolsPage::new();
        page.load(&api).await;
        assert!(!page.retry(&api).await);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error_and_offers_retry() {
        let api = api_client::HttpSchoolsClient::new("http://127.0.0.1:9");
        let mut page = ShowSchoolsPage::new();
        page.load(&api).await;

        let ListingState::Error(message) = page.state() else {
            panic!("expected error state");
        };
        assert!(message.starts_with("Network error:"), "{message}");
        assert!(page.render().contains("[ Try Again ]"));
    }

    #[tokio::test]
    async fn transport_failures_show_their_cause() {
        let api = ScriptedApi::unreachable().failing_lists(1);
        let mut page = ShowSchoolsPage::new();
        page.load(&api).await;
        let ListingState::Error(message) = page.state() else {
            panic!("expected error state");
        };
        assert!(message.contains("connection reset"));
    }
}
