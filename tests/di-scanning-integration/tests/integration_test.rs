//! 约定式扫描注册的端到端测试

use di_abstractions::{Implementation, RegistrationStrategy, ServiceDescriptor};
use di_scanning::{Assembly, ScanProfile, ServiceCollection, TypeScan};
use infrastructure_common::{
    BuildError, Lifetime, ScanError, ServiceMarker, TypeDescriptor, TypeRef,
};
use std::io::Write;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

const NS: &str = "sample";

fn t(name: &str) -> TypeRef {
    TypeRef::new(NS, name)
}

fn string() -> TypeRef {
    TypeRef::new("", "String")
}

fn int() -> TypeRef {
    TypeRef::new("", "i32")
}

fn transient_service(name: &str) -> TypeDescriptor {
    TypeDescriptor::class(NS, name).implements(t("ITransientService"))
}

/// 测试程序集，声明顺序即添加顺序
fn sample_assembly() -> Assembly {
    Assembly::new(NS)
        .with_type(TypeDescriptor::interface(NS, "ITransientService"))
        .with_type(transient_service("TransientService1"))
        .with_type(transient_service("TransientService2"))
        .with_type(transient_service("TransientService"))
        .with_type(
            TypeDescriptor::interface(NS, "IQueryHandler")
                .with_generic_params(["TQuery", "TResult"]),
        )
        .with_type(
            TypeDescriptor::class(NS, "QueryHandler")
                .implements(t("IQueryHandler").with_arg(string()).with_arg(int())),
        )
        .with_type(
            TypeDescriptor::class(NS, "BaseQueryHandler")
                .with_generic_param("T")
                .implements(t("IQueryHandler").with_param("T").with_arg(int())),
        )
}

#[test]
fn test_transient_service_scenario() {
    init_test_logger();
    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly(sample_assembly())
                .add_classes_where(|f| f.assignable_to(t("ITransientService")))
                .as_implemented_interfaces()
                .with_transient_lifetime(),
        )
        .unwrap();

    assert_eq!(services.len(), 3);
    let implementations: Vec<&str> = services
        .iter()
        .map(|d| d.implementation_type().name.as_str())
        .collect();
    assert_eq!(implementations, ["TransientService1", "TransientService2", "TransientService"]);
    for descriptor in &services {
        assert_eq!(descriptor.service_type, t("ITransientService"));
        assert_eq!(descriptor.lifetime, Lifetime::Transient);
    }
}

#[test]
fn test_open_generic_query_handler_scenario() {
    init_test_logger();
    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly(sample_assembly())
                .add_classes_where(|f| {
                    f.assignable_to(TypeRef::open_definition(NS, "IQueryHandler", 2))
                })
                .as_implemented_interfaces()
                .with_transient_lifetime(),
        )
        .unwrap();

    assert_eq!(services.len(), 1);
    let descriptor = services.iter().next().unwrap();
    assert_eq!(descriptor.implementation_type(), &t("QueryHandler"));
    assert_eq!(
        descriptor.service_type,
        t("IQueryHandler").with_arg(string()).with_arg(int())
    );
    assert!(services.build_service_provider().is_ok());
}

#[test]
fn test_open_generic_never_registered_by_any_strategy() {
    init_test_logger();
    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly(sample_assembly())
                .add_classes()
                .as_self()
                .with_transient_lifetime()
                .add_classes()
                .as_implemented_interfaces()
                .with_singleton_lifetime()
                .add_classes()
                .as_self_with_interfaces()
                .with_scoped_lifetime(),
        )
        .unwrap();

    assert!(services.iter().all(|d| !d.implementation_type().is_open()));
    assert!(services.iter().all(|d| d.implementation_type().name != "BaseQueryHandler"));
    assert!(services.build_service_provider().is_ok());
}

#[test]
fn test_manual_open_generic_fails_only_at_build() {
    let mut services = ServiceCollection::new();
    services.add(ServiceDescriptor::transient(
        t("IQueryHandler").with_arg(string()).with_arg(int()),
        TypeRef::open_definition(NS, "BaseQueryHandler", 1),
    ));
    assert!(matches!(
        services.build_service_provider(),
        Err(BuildError::OpenGenericImplementation { .. })
    ));
}

#[test]
fn test_implemented_interfaces_use_step_lifetime() {
    let assembly = Assembly::new(NS)
        .with_type(TypeDescriptor::interface(NS, "IReader"))
        .with_type(TypeDescriptor::interface(NS, "IWriter"))
        .with_type(
            TypeDescriptor::class(NS, "FileStore")
                .implements(t("IReader"))
                .implements(t("IWriter")),
        )
        .with_type(TypeDescriptor::class(NS, "NetStore").implements(t("IReader")));

    for lifetime in [Lifetime::Transient, Lifetime::Scoped, Lifetime::Singleton] {
        let mut services = ServiceCollection::new();
        services
            .scan(
                TypeScan::from_assembly(assembly.clone())
                    .add_classes_where(|f| f.assignable_to(t("IReader")))
                    .as_implemented_interfaces()
                    .with_lifetime(lifetime),
            )
            .unwrap();
        assert_eq!(services.len(), 3);
        assert!(services.iter().all(|d| d.lifetime == lifetime));
        assert!(services
            .iter()
            .all(|d| d.service_type == t("IReader") || d.service_type == t("IWriter")));
    }
}

#[test]
fn test_explicit_contract_is_exact() {
    let assembly = Assembly::new(NS)
        .with_type(TypeDescriptor::interface(NS, "IReader"))
        .with_type(TypeDescriptor::interface(NS, "IWriter"))
        .with_type(
            TypeDescriptor::class(NS, "FileStore")
                .implements(t("IReader"))
                .implements(t("IWriter")),
        );

    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly(assembly)
                .add_classes()
                .as_contract(t("IWriter"))
                .with_scoped_lifetime(),
        )
        .unwrap();

    assert_eq!(services.len(), 1);
    let descriptor = services.iter().next().unwrap();
    assert_eq!(descriptor.service_type, t("IWriter"));
    assert_eq!(descriptor.implementation, Implementation::Type(t("FileStore")));
}

#[test]
fn test_matching_interface_namespace_constraint_is_monotonic() {
    let assembly = Assembly::new("shop")
        .with_type(TypeDescriptor::interface("shop::orders", "IOrderService"))
        .with_type(TypeDescriptor::interface("shop::contracts", "IInvoiceService"))
        .with_type(TypeDescriptor::interface("shop::billing", "IBillingService"))
        .with_type(
            TypeDescriptor::class("shop::orders", "OrderService")
                .implements(TypeRef::new("shop::orders", "IOrderService")),
        )
        .with_type(
            TypeDescriptor::class("shop::billing", "InvoiceService")
                .implements(TypeRef::new("shop::contracts", "IInvoiceService")),
        )
        .with_type(
            TypeDescriptor::class("shop::billing", "BillingService")
                .implements(TypeRef::new("shop::billing", "IBillingService")),
        )
        .with_type(TypeDescriptor::class("shop::billing", "Ledger"));

    let mut unconstrained = ServiceCollection::new();
    unconstrained
        .scan(
            TypeScan::from_assembly(assembly.clone())
                .add_classes()
                .as_matching_interface(),
        )
        .unwrap();

    let mut constrained = ServiceCollection::new();
    constrained
        .scan(
            TypeScan::from_assembly(assembly)
                .add_classes()
                .as_matching_interface_where(|class: &TypeDescriptor, interface: &TypeRef| {
                    interface.namespace == class.namespace
                }),
        )
        .unwrap();

    assert_eq!(unconstrained.len(), 3);
    assert_eq!(constrained.len(), 2);
    assert!(constrained.len() <= unconstrained.len());
    for descriptor in &constrained {
        assert_eq!(
            descriptor.service_type.namespace,
            descriptor.implementation_type().namespace
        );
    }
}

#[test]
fn test_three_markers_produce_three_entries() {
    let assembly = Assembly::new(NS)
        .with_type(TypeDescriptor::interface(NS, "IFirst"))
        .with_type(TypeDescriptor::interface(NS, "ISecond"))
        .with_type(TypeDescriptor::interface(NS, "IThird"))
        .with_type(
            TypeDescriptor::class(NS, "MultiService")
                .implements(t("IFirst"))
                .implements(t("ISecond"))
                .implements(t("IThird"))
                .with_marker(ServiceMarker::new(t("IFirst")).with_lifetime(Lifetime::Transient))
                .with_marker(ServiceMarker::new(t("ISecond")).with_lifetime(Lifetime::Scoped))
                .with_marker(ServiceMarker::new(t("IThird")).with_lifetime(Lifetime::Singleton)),
        )
        .with_type(TypeDescriptor::class(NS, "Unmarked").implements(t("IFirst")));

    let mut services = ServiceCollection::new();
    services
        .scan(TypeScan::from_assembly(assembly).add_classes().using_attributes())
        .unwrap();

    let pairs: Vec<(String, Lifetime)> = services
        .iter()
        .map(|d| (d.service_type.name.clone(), d.lifetime))
        .collect();
    assert_eq!(
        pairs,
        [
            ("IFirst".to_string(), Lifetime::Transient),
            ("ISecond".to_string(), Lifetime::Scoped),
            ("IThird".to_string(), Lifetime::Singleton),
        ]
    );
    assert!(services
        .iter()
        .all(|d| d.implementation_type() == &t("MultiService")));
}

#[test]
fn test_duplicate_marker_rejected_and_collection_unchanged() {
    let assembly = Assembly::new(NS)
        .with_type(TypeDescriptor::interface(NS, "IFirst"))
        .with_type(
            TypeDescriptor::class(NS, "Twice")
                .implements(t("IFirst"))
                .with_marker(ServiceMarker::new(t("IFirst")))
                .with_marker(ServiceMarker::new(t("IFirst")).with_lifetime(Lifetime::Scoped)),
        );

    let mut services = ServiceCollection::new();
    let result = services.scan(TypeScan::from_assembly(assembly).add_classes().using_attributes());
    assert!(matches!(result, Err(ScanError::DuplicateMarker { .. })));
    assert!(services.is_empty());
}

#[test]
fn test_registration_strategies_across_scans() {
    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly(sample_assembly())
                .add_classes_where(|f| f.assignable_to(t("ITransientService")))
                .as_implemented_interfaces()
                .with_transient_lifetime(),
        )
        .unwrap();

    let added = services
        .scan(
            TypeScan::from_assembly(sample_assembly())
                .add_classes_where(|f| f.assignable_to(t("ITransientService")))
                .using_registration_strategy(RegistrationStrategy::Skip)
                .as_implemented_interfaces()
                .with_singleton_lifetime(),
        )
        .unwrap();
    assert_eq!(added, 0);
    assert_eq!(services.len(), 3);

    let result = services.scan(
        TypeScan::from_assembly(sample_assembly())
            .add_classes_where(|f| f.assignable_to(t("ITransientService")))
            .using_registration_strategy(RegistrationStrategy::Throw)
            .as_implemented_interfaces(),
    );
    assert!(matches!(result, Err(ScanError::Registration { .. })));
    assert_eq!(services.len(), 3);
}

#[test]
fn test_profile_file_reproduces_fluent_scan() {
    init_test_logger();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
validate_on_build = true

[[scans]]
assembly = "sample"
assignable_to = ["ITransientService"]
strategy = "implemented_interfaces"
lifetime = "transient"

[[scans]]
assembly = "sample"
assignable_to = ["IQueryHandler<_, _>"]
strategy = "implemented_interfaces"
lifetime = "scoped"
"#
    )
    .unwrap();

    let profile = ScanProfile::load(file.path()).unwrap();
    let mut services = ServiceCollection::new();
    let added = profile
        .apply(&mut services, |name| (name == NS).then(sample_assembly))
        .unwrap();
    assert_eq!(added, 4);

    let provider = services.build_service_provider().unwrap();
    assert_eq!(provider.get_all(&t("ITransientService")).len(), 3);
    let handler = provider
        .get(&t("IQueryHandler").with_arg(string()).with_arg(int()))
        .unwrap();
    assert_eq!(handler.lifetime, Lifetime::Scoped);
}
