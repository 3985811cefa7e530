//! trybuild 编译测试

#[test]
fn trybuild_service_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/injectable_ok.rs");
    t.pass("tests/trybuild/contract_ok.rs");
}
