//! CLI driver — open the interface, gate on PHY identity, apply, report.

mod output;

use std::io::{self, Write};

use phyled_lib::apply::{self, ApplyOutcome};
use phyled_lib::config::Config;
use phyled_lib::error::Result;
use phyled_lib::mdio::{self, MdioBus};
use phyled_lib::phy::{self, PhyIdentity};
use phyled_lib::report;

use output::LedsOutput;

/// Run one invocation against the named interface.
///
/// Every token is parsed before the interface is opened. The handle is
/// dropped (and its socket closed) on every return path.
pub fn run(interface: &str, tokens: &[String], json: bool) -> Result<()> {
    let config = Config::from_tokens(tokens);
    let bus = mdio::open_interface(interface)?;
    let (identity, outcome) = configure(&bus, &config)?;
    let text = render(&bus, identity, &outcome, &config, json)?;
    emit(&mut io::stdout().lock(), &text)
}

/// Identity gate, then apply. Nothing is written to the LED page unless the
/// PHY identifies as the expected chip.
pub(crate) fn configure(
    bus: &impl MdioBus,
    config: &Config,
) -> Result<(PhyIdentity, ApplyOutcome)> {
    let identity = phy::verify_identity(bus)?;
    let outcome = apply::apply_requests(bus, &config.requests)?;
    Ok((identity, outcome))
}

/// Report text: JSON when requested, otherwise the verbosity-gated summary.
pub(crate) fn render(
    bus: &impl MdioBus,
    identity: PhyIdentity,
    outcome: &ApplyOutcome,
    config: &Config,
    json: bool,
) -> Result<String> {
    if !json {
        return Ok(report::render(outcome, config.verbosity));
    }
    let out = LedsOutput::new(bus.interface(), bus.phy_address(), identity, outcome);
    let json_str = serde_json::to_string_pretty(&out).map_err(|e| {
        phyled_lib::PhyledError::Config(format!("JSON serialization failed: {e}"))
    })?;
    Ok(format!("{json_str}\n"))
}

fn emit(out: &mut impl Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phyled_lib::PhyledError;
    use phyled_lib::mdio::MdioError;
    use phyled_lib::mdio::mock::{MOCK_PHY_ADDRESS, MockBus};
    use phyled_lib::protocol::*;

    fn config(tokens: &[&str]) -> Config {
        Config::from_tokens(tokens)
    }

    fn render_for(bus: &MockBus, tokens: &[&str], json: bool) -> String {
        let cfg = config(tokens);
        let (identity, out) = configure(bus, &cfg).unwrap();
        render(bus, identity, &out, &cfg, json).unwrap()
    }

    /// Writer whose every write fails, like stdout on a closed pipe.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn configure_applies_after_identity() {
        let bus = MockBus::with_leds(0, 0);
        let (identity, out) = configure(&bus, &config(&["bha", "y"])).unwrap();
        assert_eq!(identity.id1, 0x001c);
        assert_eq!(out.after.lacr, 0x0040);
        assert_eq!(out.after.lcr, 0x0400);
    }

    #[test]
    fn configure_rejects_foreign_phy() {
        let bus = MockBus::with_leds(0, 0);
        bus.set(REG_PHYID1, 0x0022);
        let err = configure(&bus, &config(&["bh"])).unwrap_err();
        assert!(matches!(
            err,
            PhyledError::Mdio(MdioError::UnexpectedIdentity { .. })
        ));
        assert!(bus.writes_to(REG_LCR).is_empty());
        assert!(bus.writes_to(REG_EXT_PAGE).is_empty());
    }

    #[test]
    fn configure_survives_register_read_failure() {
        let bus = MockBus::with_leds(0, 0);
        bus.fail_read(REG_LACR);
        let text = render_for(&bus, &["bh"], false);
        assert!(text.starts_with("Phy led configuration not fully applied\n"));
        assert_eq!(bus.get(REG_LCR), 0x0400);
    }

    #[test]
    fn render_text_follows_verbosity() {
        let bus = MockBus::with_leds(0, 0);
        assert_eq!(render_for(&bus, &["q", "bh"], false), "");
    }

    #[test]
    fn render_json_ignores_verbosity() {
        let bus = MockBus::with_leds(0, 0);
        let text = render_for(&bus, &["q", "bha"], true);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["interface"], "mock0");
        assert_eq!(parsed["phy_address"], MOCK_PHY_ADDRESS);
        assert_eq!(parsed["identity"]["id1"], 0x001c);
        assert_eq!(parsed["status"], "changed");
        assert_eq!(parsed["after"]["lacr"], 0x0040);
        assert_eq!(parsed["after"]["lcr"], 0x0400);
        assert_eq!(
            parsed["leds"][0]["active"],
            serde_json::json!(["1000Mbps", "activity"])
        );
    }

    #[test]
    fn render_json_lists_failed_write() {
        let bus = MockBus::with_leds(0, 0);
        bus.fail_write(REG_LCR);
        let text = render_for(&bus, &["bh"], true);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["status"], "incomplete");
        assert_eq!(parsed["computed"]["lcr"], 0x0400);
        assert_eq!(parsed["after"]["lcr"], 0);
        assert_eq!(
            parsed["faults"],
            serde_json::json!([{"kind": "write-failed", "register": "lcr"}])
        );
    }

    #[test]
    fn render_query_json() {
        let bus = MockBus::with_leds(0, 0);
        let text = render_for(&bus, &[], true);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["status"], "query");
        assert_eq!(parsed["writes"], 0);
    }

    #[test]
    fn emit_surfaces_output_errors() {
        let err = emit(&mut BrokenPipe, "Phy led configuration changed\n").unwrap_err();
        assert!(matches!(err, PhyledError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
    }

    #[test]
    fn emit_writes_text_verbatim() {
        let mut buf = Vec::new();
        emit(&mut buf, "blue:    disabled\n").unwrap();
        assert_eq!(buf, b"blue:    disabled\n");
    }

    #[test]
    fn run_rejects_invalid_interface_name() {
        let err = run("", &[], false).unwrap_err();
        assert!(err.to_string().contains("interface"), "got: {err}");
    }
}
