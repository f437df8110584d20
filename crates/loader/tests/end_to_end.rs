mod common;

use common::AppTree;
use modkit_domain::artifact::{ArtifactKind, Category};
use modkit_domain::kinds::KindSet;
use modkit_domain::module::Identifier;
use modkit_domain::outcome::{ErrorClass, LoadState, OutcomeStatus};
use modkit_kernel::{
    Command, Container, RegistryError, ServiceProvider, TypeCatalog, component,
};
use modkit_loader::{LoadReport, ModuleLoader};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const INVOICE_CONTROLLER: &str = "App::Modules::Billing::Http::Controllers::InvoiceController";
const INVOICE_FACADE: &str = "App::Modules::Billing::Facades::Invoice";
const INVOICE_SERVICE: &str = "App::Modules::Billing::Facades::InvoiceService";

#[component]
struct InvoiceController;

#[component]
struct Invoice;

#[component]
struct InvoiceService {
    serial: usize,
}

#[component]
struct LedgerService;

#[component]
struct Mailer;

#[derive(Debug)]
struct SendReminders;

impl Command for SendReminders {
    fn name(&self) -> &str {
        "reminders:send"
    }
}

#[derive(Debug)]
struct BindsLedger;

impl ServiceProvider for BindsLedger {
    fn register(&self, container: &Container) -> Result<(), RegistryError> {
        use modkit_kernel::{Binding, Registry};
        container.bind_singleton(
            "ledger",
            Binding::Type("App::Modules::Billing::Services::LedgerService".into()),
            "BindsLedger",
        )
    }
}

#[derive(Debug)]
struct Quiet;

impl ServiceProvider for Quiet {
    fn register(&self, _container: &Container) -> Result<(), RegistryError> {
        Ok(())
    }
}

fn load<const N: usize>(tree: &AppTree, modules: [&str; N], catalog: TypeCatalog) -> (Container, LoadReport) {
    let container = Container::new(catalog);
    let report = ModuleLoader::from_config(&tree.config(modules)).load(&container);
    (container, report)
}

#[test]
fn billing_module_end_to_end() {
    let tree = AppTree::new();
    tree.touch("Billing/Http/Controllers/InvoiceController.rs");
    tree.touch("Billing/Facades/Invoice.rs");
    tree.touch("Billing/Facades/InvoiceService.rs");

    let controllers = Arc::new(AtomicUsize::new(0));
    let services = Arc::new(AtomicUsize::new(0));
    let (built_controllers, built_services) = (Arc::clone(&controllers), Arc::clone(&services));
    let catalog = TypeCatalog::builder()
        .component(INVOICE_CONTROLLER, move |_| {
            built_controllers.fetch_add(1, Ordering::SeqCst);
            Ok(InvoiceController)
        })
        .component(INVOICE_FACADE, |_| Ok(Invoice))
        .component(INVOICE_SERVICE, move |_| {
            Ok(InvoiceService { serial: built_services.fetch_add(1, Ordering::SeqCst) })
        })
        .build()
        .expect("catalog");

    let (container, report) = load(&tree, ["Billing"], catalog);

    let billing = report.module("Billing").expect("billing report");
    assert_eq!(billing.state, LoadState::FacadesLoaded);
    assert!(billing.fatal.is_none());
    assert_eq!(billing.failures().count(), 0);
    assert_eq!(billing.populated, KindSet::CONTROLLER | KindSet::FACADE);

    assert_eq!(controllers.load(Ordering::SeqCst), 1);
    assert!(container.instance(INVOICE_CONTROLLER).is_some());

    // Lazy: nothing built until first resolve.
    assert_eq!(services.load(Ordering::SeqCst), 0);
    let first = container.resolve::<InvoiceService>("Invoice").expect("facade resolves");
    let second = container.resolve::<InvoiceService>("Invoice").expect("facade resolves");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.serial, 0);
    assert_eq!(services.load(Ordering::SeqCst), 1);
}

#[test]
fn facade_without_service_is_its_own_singleton() {
    let tree = AppTree::new();
    tree.touch("Billing/Facades/Invoice.rs");
    let catalog = TypeCatalog::builder().component(INVOICE_FACADE, |_| Ok(Invoice)).build().expect("catalog");

    let (container, report) = load(&tree, ["Billing"], catalog);

    assert_eq!(report.failures().count(), 0);
    let first = container.resolve::<Invoice>("Invoice").expect("self binding");
    let second = container.resolve::<Invoice>("Invoice").expect("self binding");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn missing_facade_type_surfaces_on_first_resolve() {
    let tree = AppTree::new();
    tree.touch("Billing/Facades/Ghost.rs");

    let (container, report) = load(&tree, ["Billing"], TypeCatalog::default());

    assert_eq!(report.failures().count(), 0);
    assert!(container.has_binding("Ghost"));
    let err = container.make("Ghost").expect_err("no such type");
    assert!(matches!(err, RegistryError::Unresolvable { .. }));
}

#[test]
fn empty_module_registers_nothing() {
    let tree = AppTree::new();
    tree.mkdir("Empty");

    let (container, report) = load(&tree, ["Empty"], TypeCatalog::default());

    let empty = report.module("Empty").expect("report");
    assert_eq!(empty.state, LoadState::FacadesLoaded);
    assert_eq!(empty.registered_count(), 0);
    assert_eq!(report.fatal_count(), 0);
    assert!(empty.populated.is_empty());
    assert_eq!(empty.outcomes.len(), ArtifactKind::ORDER.len());
    assert!(empty.outcomes.iter().all(|outcome| outcome.status == OutcomeStatus::Skipped));
    assert_eq!(container.instance_count(), 0);
    assert!(container.binding_names().is_empty());
}

#[test]
fn module_without_migrations_loads_other_categories() {
    let tree = AppTree::new();
    tree.mkdir("Billing/Models");

    let (container, report) = load(&tree, ["Billing"], TypeCatalog::default());

    assert_eq!(report.failures().count(), 0);
    assert!(container.sources(Category::Migrations).is_empty());
    assert_eq!(container.sources(Category::Models), vec![tree.modules_path().join("Billing/Models")]);
}

#[test]
fn bulk_categories_are_handed_over_in_order() {
    let tree = AppTree::new();
    tree.mkdir("Billing/Repositories/Migrations");
    tree.mkdir("Billing/Database/Migrations");
    tree.mkdir("Billing/Database/Seeders");
    tree.mkdir("Billing/Database/Factories");
    tree.mkdir("Billing/Transformers");
    tree.touch("Billing/Routes/web.toml");
    let catalog = TypeCatalog::builder()
        .provider("App::Modules::Billing::Providers::RepositoryProviders", || Quiet)
        .build()
        .expect("catalog");

    let (container, report) = load(&tree, ["Billing"], catalog);

    assert_eq!(report.failures().count(), 0);
    let base = tree.modules_path().join("Billing");
    assert_eq!(
        container.sources(Category::Migrations),
        vec![base.join("Repositories/Migrations"), base.join("Database/Migrations")]
    );
    assert_eq!(container.sources(Category::Seeders), vec![base.join("Database/Seeders")]);
    assert_eq!(container.sources(Category::Routes), vec![base.join("Routes/web.toml")]);
    assert_eq!(
        container.providers(),
        vec![Identifier::from("App::Modules::Billing::Providers::RepositoryProviders")]
    );
}

#[test]
fn duplicate_command_names_conflict_but_module_goes_on() {
    let tree = AppTree::new();
    tree.touch("Billing/Console/Commands/SendReminders.rs");
    tree.touch("Shipping/Console/Commands/SendReminders.rs");
    tree.mkdir("Shipping/Models");
    let catalog = TypeCatalog::builder()
        .command("App::Modules::Billing::Console::Commands::SendReminders", || SendReminders)
        .command("App::Modules::Shipping::Console::Commands::SendReminders", || SendReminders)
        .build()
        .expect("catalog");

    let (container, report) = load(&tree, ["Billing", "Shipping"], catalog);

    let shipping = report.module("Shipping").expect("shipping report");
    assert_eq!(shipping.state, LoadState::FacadesLoaded);
    let conflicts: Vec<_> = shipping.outcomes_of(ArtifactKind::ConsoleCommand).collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].status, OutcomeStatus::Failed(ErrorClass::RegistrationConflict));
    assert!(conflicts[0].reason.as_deref().is_some_and(|reason| reason.contains("Billing")));

    assert!(shipping.populated.contains(KindSet::MODEL));
    assert_eq!(container.sources(Category::Models), vec![tree.modules_path().join("Shipping/Models")]);
    assert_eq!(container.command_names(), vec!["reminders:send".to_owned()]);
}

#[test]
fn broken_controller_aborts_only_its_module() {
    let tree = AppTree::new();
    tree.touch("Billing/Http/Controllers/InvoiceController.rs");
    tree.mkdir("Billing/Models");
    tree.mkdir("Shipping/Models");
    let catalog = TypeCatalog::builder()
        .component(INVOICE_CONTROLLER, |_| -> Result<InvoiceController, RegistryError> {
            Err(RegistryError::construction(INVOICE_CONTROLLER, "database unavailable"))
        })
        .build()
        .expect("catalog");

    let (container, report) = load(&tree, ["Billing", "Shipping"], catalog);

    let billing = report.module("Billing").expect("billing");
    assert_eq!(billing.state, LoadState::Aborted);
    assert!(billing.fatal.as_deref().is_some_and(|reason| reason.contains("database unavailable")));
    assert_eq!(billing.outcomes.len(), 1);

    let shipping = report.module("Shipping").expect("shipping");
    assert_eq!(shipping.state, LoadState::FacadesLoaded);
    assert_eq!(report.fatal_count(), 1);
    assert_eq!(container.sources(Category::Models), vec![tree.modules_path().join("Shipping/Models")]);
}

#[test]
fn services_directory_without_provider_type_is_fatal() {
    let tree = AppTree::new();
    tree.mkdir("Billing/Services");

    let (_container, report) = load(&tree, ["Billing"], TypeCatalog::default());

    let billing = report.module("Billing").expect("billing");
    assert_eq!(billing.state, LoadState::Aborted);
    assert_eq!(
        billing.outcomes_of(ArtifactKind::Service).next().map(|outcome| outcome.status),
        Some(OutcomeStatus::Failed(ErrorClass::Construction))
    );
}

#[test]
fn services_and_module_providers_are_registered() {
    let tree = AppTree::new();
    tree.mkdir("Billing/Services");
    let catalog = TypeCatalog::builder()
        .provider("App::Modules::Billing::Providers::ServiceProviders", || BindsLedger)
        .provider("App::Modules::Billing::Providers::BillingServiceProvider", || Quiet)
        .component("App::Modules::Billing::Services::LedgerService", |_| Ok(LedgerService))
        .build()
        .expect("catalog");

    let (container, report) = load(&tree, ["Billing"], catalog);

    assert_eq!(report.failures().count(), 0);
    assert_eq!(
        container.providers(),
        vec![
            Identifier::from("App::Modules::Billing::Providers::ServiceProviders"),
            Identifier::from("App::Modules::Billing::Providers::BillingServiceProvider"),
        ]
    );
    assert!(container.resolve::<LedgerService>("ledger").is_ok());
}

#[test]
fn duplicate_and_invalid_module_names() {
    let tree = AppTree::new();
    tree.mkdir("Billing/Models");

    let (container, report) = load(&tree, ["Billing", "bad-name", "Billing"], TypeCatalog::default());

    assert_eq!(report.modules.len(), 2);
    assert_eq!(report.module("bad-name").map(|m| m.state), Some(LoadState::Aborted));
    assert_eq!(report.module("Billing").map(|m| m.state), Some(LoadState::FacadesLoaded));
    assert_eq!(container.sources(Category::Models).len(), 1);
}

#[test]
fn module_config_merges_under_host_values() {
    let tree = AppTree::new();
    tree.write("Billing/Config/billing.toml", "currency = \"USD\"\ngrace_days = 14\n");
    tree.write("Billing/Config/broken.toml", "currency = \n");

    let container = Container::new(TypeCatalog::default());
    container.seed_config("Billing", json!({ "currency": "EUR" }));
    let report = ModuleLoader::from_config(&tree.config(["Billing"])).load(&container);

    let billing = report.module("Billing").expect("billing");
    assert_eq!(billing.state, LoadState::FacadesLoaded);
    let statuses: Vec<_> = billing.outcomes_of(ArtifactKind::Config).map(|outcome| outcome.status).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::Registered, OutcomeStatus::Failed(ErrorClass::Configuration)]
    );
    assert_eq!(container.config_value("Billing.currency"), Some(json!("EUR")));
    assert_eq!(container.config_value("Billing.grace_days"), Some(json!(14)));
}

#[test]
fn manifest_binds_facades_to_module_services() {
    let tree = AppTree::new();
    tree.touch("Billing/Facades/Ledger.rs");
    tree.touch("Billing/Facades/Receipt.rs");
    tree.write(
        "Billing/Providers/bindings.toml",
        "[[facade]]\nname = \"Ledger\"\nservice = \"LedgerService\"\n\n[[facade]]\nname = \"Receipt\"\nservice = \"ReceiptService\"\n",
    );
    let catalog = TypeCatalog::builder()
        .component("App::Modules::Billing::Services::LedgerService", |_| Ok(LedgerService))
        .build()
        .expect("catalog");

    let (container, report) = load(&tree, ["Billing"], catalog);

    let billing = report.module("Billing").expect("billing");
    assert_eq!(billing.state, LoadState::FacadesLoaded);
    let statuses: Vec<_> = billing.outcomes_of(ArtifactKind::Facade).map(|outcome| outcome.status).collect();
    assert!(statuses.contains(&OutcomeStatus::Failed(ErrorClass::InvalidManifest)));
    assert!(container.resolve::<LedgerService>("Ledger").is_ok());
    assert!(!container.has_binding("Receipt"));
}

#[test]
fn app_manifest_binds_app_services() {
    let tree = AppTree::new();
    tree.app_manifest(
        "[[facade]]\nname = \"Mail\"\nservice = \"Mailer\"\nscope = \"app\"\n\n[[facade]]\nname = \"Sms\"\nservice = \"SmsGateway\"\nscope = \"app\"\n",
    );
    let catalog = TypeCatalog::builder().component("App::Services::Mailer", |_| Ok(Mailer)).build().expect("catalog");
    let container = Container::new(catalog);

    let outcomes = ModuleLoader::from_config(&tree.config([])).bind_app_facades(&container);

    let statuses: Vec<_> = outcomes.iter().map(|outcome| outcome.status).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::Registered, OutcomeStatus::Failed(ErrorClass::InvalidManifest)]
    );
    assert!(container.resolve::<Mailer>("Mail").is_ok());
    assert_eq!(container.binding_origin("Mail").as_deref(), Some("app"));
}

#[test]
fn same_facade_name_in_two_modules_conflicts() {
    let tree = AppTree::new();
    tree.touch("Billing/Facades/Invoice.rs");
    tree.touch("Shipping/Facades/Invoice.rs");

    let (container, report) = load(&tree, ["Billing", "Shipping"], TypeCatalog::default());

    let shipping = report.module("Shipping").expect("shipping");
    assert_eq!(shipping.state, LoadState::FacadesLoaded);
    assert_eq!(
        shipping.failures().map(|outcome| outcome.status).collect::<Vec<_>>(),
        vec![OutcomeStatus::Failed(ErrorClass::RegistrationConflict)]
    );
    assert_eq!(container.binding_origin("Invoice").as_deref(), Some(INVOICE_FACADE));
}
