//! 演示类型
//!
//! 这些类型只通过宏注册类型描述符，程序本身不会构造它们。

#![allow(dead_code)]

pub mod contracts {
    use service_macros::service_contract;

    #[service_contract]
    pub trait ITransientService {}

    #[service_contract]
    pub trait IOtherInheritance {}

    #[service_contract]
    pub trait IQueryHandler<TQuery, TResult> {}

    #[service_contract]
    pub trait IAuditable {}
}

pub mod services {
    use service_macros::Injectable;

    #[derive(Injectable)]
    #[injectable(
        implements = "super::contracts::ITransientService",
        implements = "super::contracts::IOtherInheritance"
    )]
    pub struct TransientService1;

    #[derive(Injectable)]
    #[injectable(implements = "super::contracts::ITransientService")]
    pub struct TransientService2;

    /// 抽象基类型，不会被扫描到
    #[derive(Injectable)]
    #[injectable(implements = "super::contracts::ITransientService", is_abstract)]
    pub struct TransientServiceBase;

    #[derive(Injectable)]
    #[injectable(base = "TransientServiceBase")]
    pub struct DerivedTransientService;
}

pub mod queries {
    use service_macros::Injectable;
    use std::marker::PhantomData;

    pub struct CountQuery;

    #[derive(Injectable)]
    #[injectable(implements = "super::contracts::IQueryHandler<CountQuery, usize>")]
    pub struct CountQueryHandler;

    /// 开放泛型实现，按约定扫描时跳过
    #[derive(Injectable)]
    #[injectable(implements = "super::contracts::IQueryHandler<T, String>")]
    pub struct EchoQueryHandler<T> {
        marker: PhantomData<T>,
    }
}

pub mod data {
    use service_macros::{service_contract, Injectable};

    #[service_contract]
    pub trait IUserRepository {}

    #[service_contract]
    pub trait IOrderRepository {}

    #[derive(Injectable)]
    #[injectable(implements = "IUserRepository")]
    pub struct UserRepository;

    #[derive(Injectable)]
    #[injectable(
        implements = "IOrderRepository",
        implements = "crate::demo::contracts::IAuditable"
    )]
    pub struct OrderRepository;

    #[derive(Injectable)]
    #[injectable(implements = "IUserRepository", internal)]
    pub struct CachedUserRepository;
}

pub mod annotated {
    use service_macros::Injectable;

    #[derive(Injectable)]
    #[injectable(implements = "crate::demo::contracts::IAuditable", attribute = "Annotated")]
    #[service_descriptor(contract = "crate::demo::contracts::IAuditable", lifetime = "singleton")]
    pub struct AuditTrail;

    #[derive(Injectable)]
    #[injectable(attribute = "Annotated")]
    #[service_descriptor]
    pub enum Clock {
        System,
        Fixed(u64),
    }
}
