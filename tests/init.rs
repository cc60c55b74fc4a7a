#![cfg(feature = "layer")]

use logstash_formatter::init::{init_tracing, init_tracing_with_writer, InitError};
use logstash_formatter::FormatterConfig;
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// The global subscriber can only be installed once per process, so this
// binary holds a single test.
#[test]
fn installs_global_subscriber_once() {
    let out = Captured::default();
    let config = FormatterConfig::new().with_type_label("orders");
    init_tracing_with_writer(config, out.clone()).unwrap();

    tracing::warn!(order_id = 7, "payment retried");

    let buf = out.0.lock().unwrap().clone();
    let text = String::from_utf8(buf).unwrap();
    let doc: Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(doc["type"], "orders");
    assert_eq!(doc["message"], "payment retried");
    assert_eq!(doc["level"], "warning");
    assert_eq!(doc["order_id"], 7);

    let err = init_tracing(FormatterConfig::default()).unwrap_err();
    assert!(matches!(err, InitError::SetGlobalDefault(_)));
}
