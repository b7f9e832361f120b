//! Library integration tests.

use hostcheck::HostcheckError;

#[test]
fn error_types_are_public() {
    let err = HostcheckError::UnknownCheck {
        id: "check-test".into(),
    };
    assert!(err.to_string().contains("check-test"));
}

#[test]
fn check_errors_carry_the_check_id() {
    let err = HostcheckError::DetectionFailed {
        check: "check-crc-dnsmasq-file".into(),
        reason: "/etc/NetworkManager/dnsmasq.d/crc.conf does not exist".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("check-crc-dnsmasq-file"));
    assert!(msg.contains("does not exist"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> hostcheck::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use hostcheck::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["hostcheck", "list", "--json"]);
    if let Commands::List(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected List command");
    }
}
