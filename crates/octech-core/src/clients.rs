use std::str::FromStr;

use octech_schema::{Client, ClientStatus, ClientType};
use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown tab: {0}")]
    UnknownTab(String),
}

/// Tabs of the client management view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientTab {
    #[default]
    All,
    Active,
    Leads,
    Inactive,
    Business,
    Residential,
}

impl ClientTab {
    fn admits(&self, client: &Client) -> bool {
        match self {
            ClientTab::All => true,
            ClientTab::Active => client.status == ClientStatus::Active,
            ClientTab::Leads => client.status == ClientStatus::Lead,
            ClientTab::Inactive => client.status == ClientStatus::Inactive,
            ClientTab::Business => client.client_type == ClientType::Business,
            ClientTab::Residential => client.client_type == ClientType::Residential,
        }
    }
}

impl FromStr for ClientTab {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "leads" => Ok(Self::Leads),
            "inactive" => Ok(Self::Inactive),
            "business" => Ok(Self::Business),
            "residential" => Ok(Self::Residential),
            other => Err(FilterError::UnknownTab(other.to_string())),
        }
    }
}

/// Clients whose name or email contains `search` (case-insensitive) and
/// who belong to `tab`, in input order.
pub fn filter_clients(clients: &[Client], tab: ClientTab, search: &str) -> Vec<Client> {
    let needle = search.to_lowercase();
    clients
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
        })
        .filter(|c| tab.admits(c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn names(clients: &[Client]) -> Vec<&str> {
        clients.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn leads_tab_with_sarah_finds_sarah_johnson() {
        let clients = fixtures::clients();
        let found = filter_clients(&clients, ClientTab::Leads, "sarah");
        assert_eq!(names(&found), ["Sarah Johnson"]);
    }

    #[test]
    fn empty_search_on_all_returns_everything_in_order() {
        let clients = fixtures::clients();
        let found = filter_clients(&clients, ClientTab::All, "");
        assert_eq!(found, clients);
    }

    #[test]
    fn tabs_apply_status_and_type_predicates() {
        let clients = fixtures::clients();
        assert_eq!(
            names(&filter_clients(&clients, ClientTab::Active, "")),
            ["John Smith", "Acme Corporation", "Michael Brown"]
        );
        assert_eq!(
            names(&filter_clients(&clients, ClientTab::Inactive, "")),
            ["Tech Solutions LLC"]
        );
        assert_eq!(
            names(&filter_clients(&clients, ClientTab::Business, "")),
            ["Acme Corporation", "Tech Solutions LLC"]
        );
        assert_eq!(filter_clients(&clients, ClientTab::Residential, "").len(), 3);
    }

    #[test]
    fn search_matches_email_case_insensitively() {
        let clients = fixtures::clients();
        let found = filter_clients(&clients, ClientTab::All, "ACMECORP.COM");
        assert_eq!(names(&found), ["Acme Corporation"]);
        assert!(filter_clients(&clients, ClientTab::Leads, "john smith").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let clients = fixtures::clients();
        let first = filter_clients(&clients, ClientTab::Residential, "example");
        let second = filter_clients(&clients, ClientTab::Residential, "example");
        assert_eq!(first, second);
        assert_eq!(filter_clients(&first, ClientTab::Residential, "example"), first);
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!("leads".parse::<ClientTab>(), Ok(ClientTab::Leads));
        assert!("lead".parse::<ClientTab>().is_err());
    }
}
