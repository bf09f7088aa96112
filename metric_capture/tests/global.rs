#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::{
    any::Any,
    fmt,
    sync::{Arc, Mutex, OnceLock},
};

use metric_capture::{
    accessors, capture, capture_option, CaptureError, CaptureRecorder, HelperRegistry, LogSink,
    NameHelper, Operation, RecorderConfig,
};

#[derive(Default)]
struct RecordingLog(Mutex<Vec<String>>);

impl RecordingLog {
    fn warnings_mentioning(&self, needle: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.contains(needle))
            .count()
    }
}

impl LogSink for RecordingLog {
    fn debug(&self, _args: fmt::Arguments<'_>) {}

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.0.lock().unwrap().push(args.to_string());
    }
}

#[derive(Debug)]
struct Reply {
    code: u16,
}

impl Reply {
    fn code(&self) -> u16 {
        self.code
    }
}

accessors!(Reply { code });

#[derive(Default)]
struct CodeClass;

impl NameHelper for CodeClass {
    fn name(&self, value: &dyn Any) -> Result<String, CaptureError> {
        let reply = value
            .downcast_ref::<Reply>()
            .ok_or_else(|| CaptureError::naming("expected a Reply"))?;
        Ok(format!(".{}xx", reply.code / 100))
    }
}

#[derive(Default)]
struct Unrelated;

struct Setup {
    recorder: CaptureRecorder,
    log: Arc<RecordingLog>,
}

fn setup() -> &'static Setup {
    static SETUP: OnceLock<Setup> = OnceLock::new();
    SETUP.get_or_init(|| {
        let recorder = CaptureRecorder::new(RecorderConfig::default()).unwrap();
        assert!(recorder.install());

        let log = Arc::new(RecordingLog::default());
        assert!(metric_capture::set_log_sink(log.clone()));

        let mut helpers = HelperRegistry::new();
        helpers
            .register::<CodeClass>("app::CodeClass")
            .register_foreign::<Unrelated>("app::Unrelated");
        assert!(metric_capture::set_helpers(helpers));

        Setup { recorder, log }
    })
}

#[test]
fn bindings_are_set_once() {
    let s = setup();
    assert!(!s.recorder.install());
    assert!(!metric_capture::set_log_sink(RecordingLog::default()));
    assert!(!metric_capture::set_helpers(HelperRegistry::new()));
}

#[test]
fn free_functions_use_installed_bindings() {
    let s = setup();
    let reply = Reply { code: 503 };

    metric_capture::mark_capture(Some(&7), "free.direct.");
    metric_capture::count_capture_with_method(Some(&reply), "free.method.", "code");
    metric_capture::count_capture_using_helper(Some(&reply), "free.helper", "app::CodeClass");
    metric_capture::mark_capture_with_method(Some(&reply), "free.missing", "body");
    metric_capture::mark_capture_using_helper(Some(&reply), "free.foreign", "app::Unrelated");
    metric_capture::count_capture::<str>(None, "free.none");

    let r = &s.recorder;
    assert_eq!(r.total("free.direct.7", Operation::Mark).unwrap(), 1);
    assert_eq!(r.total("free.method.503", Operation::Count).unwrap(), 1);
    assert_eq!(r.total("free.helper.5xx", Operation::Count).unwrap(), 1);
    assert_eq!(r.total("free.missing_default", Operation::Mark).unwrap(), 1);
    assert_eq!(
        r.total("free.foreign_error_invalid_helper", Operation::Mark)
            .unwrap(),
        1
    );
    assert_eq!(r.total("free.none_nullreturn", Operation::Count).unwrap(), 1);

    assert_eq!(s.log.warnings_mentioning("body"), 1);
    assert_eq!(s.log.warnings_mentioning("app::Unrelated"), 0);
}

#[test]
fn macros_record_and_return_the_value() {
    let s = setup();

    let status = capture!(count, "macro.status.", 200u16);
    assert_eq!(status, 200);

    let reply = capture!(mark, "macro.code.", method = "code", Reply { code: 404 });
    assert_eq!(reply.code, 404);

    let reply = capture!(count, "macro.class", helper = "app::CodeClass", reply);
    assert_eq!(reply.code, 404);

    let found: Option<u32> = capture_option!(count, "macro.lookup.", None);
    assert_eq!(found, None);
    let found = capture_option!(count, "macro.lookup.", Some(9u32));
    assert_eq!(found, Some(9));

    let r = &s.recorder;
    assert_eq!(r.total("macro.status.200", Operation::Count).unwrap(), 1);
    assert_eq!(r.total("macro.code.404", Operation::Mark).unwrap(), 1);
    assert_eq!(r.total("macro.class.4xx", Operation::Count).unwrap(), 1);
    assert_eq!(
        r.total("macro.lookup._nullreturn", Operation::Count)
            .unwrap(),
        1
    );
    assert_eq!(r.total("macro.lookup.9", Operation::Count).unwrap(), 1);
}
