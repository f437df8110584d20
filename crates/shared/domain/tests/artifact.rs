use modkit_domain::artifact::{ArtifactKind, ArtifactShape, Category, Operation};
use modkit_domain::kinds::KindSet;
use modkit_domain::module::Identifier;
use modkit_domain::outcome::LoadState;
use std::str::FromStr;
use strum::IntoEnumIterator;

#[test]
fn load_order_matches_declaration_order() {
    let declared: Vec<_> = ArtifactKind::iter().collect();
    assert_eq!(declared, ArtifactKind::ORDER.to_vec());
    assert_eq!(ArtifactKind::ORDER.first(), Some(&ArtifactKind::Controller));
    assert_eq!(ArtifactKind::ORDER.last(), Some(&ArtifactKind::Facade));
}

#[test]
fn convention_table_entries() {
    assert_eq!(ArtifactKind::Controller.segments(), &["Http", "Controllers"]);
    assert_eq!(ArtifactKind::Migration.segments(), &["Database", "Migrations"]);
    assert_eq!(ArtifactKind::Route.shape(), ArtifactShape::SingleFile);
    assert_eq!(ArtifactKind::Provider.shape(), ArtifactShape::Derived);
    assert_eq!(ArtifactKind::Model.operation(), Operation::Load(Category::Models));
    assert_eq!(ArtifactKind::ConsoleCommand.operation(), Operation::RegisterCommands);
}

#[test]
fn kinds_parse_case_insensitively() {
    assert_eq!(ArtifactKind::from_str("console_command").ok(), Some(ArtifactKind::ConsoleCommand));
    assert_eq!(ArtifactKind::from_str("Facade").ok(), Some(ArtifactKind::Facade));
    assert!(ArtifactKind::from_str("widget").is_err());
}

#[test]
fn kind_set_iterates_in_load_order() {
    let set: KindSet = [ArtifactKind::Facade, ArtifactKind::Controller, ArtifactKind::Model]
        .into_iter()
        .collect();
    let kinds: Vec<_> = set.kinds().collect();
    assert_eq!(kinds, vec![ArtifactKind::Controller, ArtifactKind::Model, ArtifactKind::Facade]);

    assert_eq!(KindSet::from("all"), KindSet::ALL);
    assert_eq!(KindSet::from("route"), KindSet::ROUTE);
    assert!(KindSet::from("nope").is_empty());
    assert_eq!(KindSet::ALL.kinds().count(), 13);
}

#[test]
fn load_state_walks_every_step_once() {
    let mut state = LoadState::Pending;
    let mut visited = Vec::new();
    while let Some(kind) = state.next_kind() {
        visited.push(kind);
        state = LoadState::after(kind);
    }
    assert_eq!(visited, ArtifactKind::ORDER.to_vec());
    assert_eq!(state, LoadState::FacadesLoaded);
    assert!(state.is_terminal());
    assert!(LoadState::Aborted.next_kind().is_none());
}

#[test]
fn identifier_helpers() {
    let ns = Identifier::new("App").join_all(["Modules", "Billing"]);
    assert_eq!(ns.as_str(), "App::Modules::Billing");

    let service = ns.join_all(["Facades", "Invoice"]).with_suffix("Service");
    assert_eq!(service.as_str(), "App::Modules::Billing::Facades::InvoiceService");
    assert_eq!(service.name(), "InvoiceService");
    assert_eq!(Identifier::new("Bare").name(), "Bare");
}
