use service_macros::{service_contract, Injectable};

#[service_contract]
pub trait IGreeter {}

#[derive(Injectable)]
#[injectable(implements = "IGreeter")]
#[service_descriptor(contract = "IGreeter", lifetime = "singleton")]
pub struct Greeter;

#[derive(Injectable)]
#[injectable(base = "Greeter", namespace = "custom::place")]
pub struct Derived<T> {
    _value: Option<T>,
}

fn main() {
    let _ = Greeter;
    let _ = Derived::<u8> { _value: None };
}
