//! 服务宏集成测试

use di_abstractions::ServiceRegistry;
use di_scanning::{Assembly, ServiceCollection, TypeScan};
use infrastructure_common::{Lifetime, TypeRef};

mod contracts {
    use service_macros::service_contract;

    #[service_contract]
    pub trait IRepository<T> {}

    #[service_contract]
    pub trait IUserRepository: IRepository<String> + Send {}

    #[service_contract]
    pub trait IOrderService {}

    #[service_contract]
    pub trait IAuditable {}
}

mod services {
    use service_macros::Injectable;

    #[derive(Injectable)]
    #[injectable(implements = "crate::contracts::IUserRepository")]
    pub struct UserRepository;

    #[derive(Injectable)]
    #[injectable(
        implements = "crate::contracts::IOrderService",
        implements = "crate::contracts::IAuditable",
        attribute = "Audited"
    )]
    #[service_descriptor(contract = "crate::contracts::IOrderService", lifetime = "scoped")]
    #[service_descriptor(contract = "crate::contracts::IAuditable", lifetime = "singleton")]
    pub struct OrderService;

    #[derive(Injectable)]
    #[injectable(implements = "crate::contracts::IRepository<T>")]
    pub struct MemoryRepository<T> {
        pub items: Vec<T>,
    }

    #[derive(Injectable)]
    #[injectable(is_abstract)]
    pub struct ServiceBase;

    #[derive(Injectable)]
    #[injectable(base = "ServiceBase", internal)]
    #[service_descriptor]
    pub enum Clock {
        System,
    }
}

fn contract(name: &str) -> TypeRef {
    TypeRef::new("integration_tests::contracts", name)
}

fn service(name: &str) -> TypeRef {
    TypeRef::new("integration_tests::services", name)
}

#[test]
fn test_macros_register_types_under_module_path() {
    let assembly = Assembly::of::<services::OrderService>();
    assert_eq!(assembly.name(), "integration_tests");

    let order = assembly.find("OrderService").unwrap();
    assert_eq!(order.namespace, "integration_tests::services");
    assert_eq!(order.interfaces, vec![contract("IOrderService"), contract("IAuditable")]);
    assert!(order.has_attribute("Audited"));
    assert_eq!(order.markers.len(), 2);
    assert!(order.location.is_some());

    let user_repository = assembly.find("IUserRepository").unwrap();
    assert!(user_repository.is_interface());
    assert_eq!(
        user_repository.interfaces[0],
        contract("IRepository").with_arg(TypeRef::new("", "String"))
    );

    let memory = assembly.find("MemoryRepository").unwrap();
    assert!(memory.is_open_generic());
    assert_eq!(memory.interfaces[0], contract("IRepository").with_param("T"));
}

#[test]
fn test_rust_type_ref_matches_macro_descriptor() {
    assert_eq!(TypeRef::of::<dyn contracts::IOrderService>(), contract("IOrderService"));
    assert_eq!(TypeRef::of::<services::OrderService>(), service("OrderService"));
}

#[test]
fn test_scan_implemented_interfaces_through_inheritance() {
    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly_of::<services::UserRepository>()
                .add_classes_where(|f| f.assignable_to(TypeRef::open_definition(
                    "integration_tests::contracts",
                    "IRepository",
                    1,
                )))
                .as_implemented_interfaces()
                .with_scoped_lifetime(),
        )
        .unwrap();

    let types: Vec<String> = services.iter().map(|d| d.service_type.to_string()).collect();
    assert_eq!(
        types,
        [
            "integration_tests::contracts::IUserRepository",
            "integration_tests::contracts::IRepository<String>"
        ]
    );
    assert!(services.iter().all(|d| d.lifetime == Lifetime::Scoped));
}

#[test]
fn test_scan_using_attributes() {
    let mut services = ServiceCollection::new();
    services
        .scan(
            TypeScan::from_assembly_of::<services::OrderService>()
                .add_classes_where(|f| f.include_non_public())
                .using_attributes(),
        )
        .unwrap();

    let order = services.descriptors_for(&contract("IOrderService"));
    assert_eq!(order[0].lifetime, Lifetime::Scoped);
    let auditable = services.descriptors_for(&contract("IAuditable"));
    assert_eq!(auditable[0].lifetime, Lifetime::Singleton);

    assert!(services.contains(&service("Clock")));
    assert!(services.contains(&service("ServiceBase")));
    assert!(!services.contains(&service("MemoryRepository")));
    assert_eq!(services.len(), 4);
}
