use std::io;
use std::sync::{Arc, Mutex};
use validation::{from_fn, Errors, Record, Validator};

pub fn failing_validator() -> impl Validator {
    from_fn(|_, _| Err(Errors::base("invalid")))
}

pub fn succeeding_validator() -> impl Validator {
    from_fn(|_, _| Ok(()))
}

/// Remembers the attribute scope of every call
#[derive(Clone, Default)]
pub struct RecordingValidator {
    fail: bool,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingValidator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn seen_attributes(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Validator for RecordingValidator {
    fn validate(&self, _record: &dyn Record, attributes: &[String]) -> Result<(), Errors> {
        self.calls.lock().unwrap().push(attributes.to_vec());
        if self.fail {
            Err(Errors::base("invalid"))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a trace-level subscriber and return everything it logged
pub fn captured_logs(f: impl FnOnce()) -> String {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
