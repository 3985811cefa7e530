use service_macros::service_contract;

#[service_contract(namespace = "app::contracts")]
pub trait IRepository<T>: Send + Sync {
    fn get(&self) -> Option<T>;
}

#[service_contract]
pub trait IUserRepository: IRepository<String> {}

struct Users;

impl IRepository<String> for Users {
    fn get(&self) -> Option<String> {
        None
    }
}

impl IUserRepository for Users {}

fn main() {
    let users: Box<dyn IUserRepository> = Box::new(Users);
    assert!(users.get().is_none());
}
