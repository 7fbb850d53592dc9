use super::*;

#[test]
fn display_messages_include_kind() {
    let e = Error::Precondition("segment already owned".into());
    assert!(e.to_string().contains("precondition violation"));
    assert!(e.to_string().contains("segment already owned"));
}

#[test]
fn engine_err_builds_matching_variant() {
    fn lookup() -> Result<()> {
        Err(engine_err!(LookupMiss, "no loader for {}", "foo.war"))
    }
    match lookup() {
        Err(Error::LookupMiss(msg)) => assert!(msg.contains("foo.war")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn engine_bail_returns_early() {
    fn f(ok: bool) -> Result<i32> {
        if !ok {
            engine_bail!(Allocation, "out of memory for {} bytes", 16);
        }
        Ok(1)
    }
    assert!(matches!(f(false), Err(Error::Allocation(_))));
    assert_eq!(f(true).unwrap(), 1);
}
