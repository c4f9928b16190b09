mod common;

use std::fs;
use std::sync::Arc;

use brrtrouter_accesslog::access_log::{
    AccessLogConfig, AccessLogError, AccessLogHandler, AccessLogReceiver,
    FileAccessLogReceiver, MemoryAccessLogReceiver,
};
use brrtrouter_accesslog::exchange::HttpExchange;
use chrono::Local;
use common::exchanges::pet_listing;
use http::{Method, StatusCode};

#[test]
fn test_file_receiver_writes_lines() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", ".log", true).unwrap();
    receiver.log_message("Test message");
    receiver.log_message("Second message");
    receiver.flush();

    let written = fs::read_to_string(dir.path().join("access.log")).unwrap();
    assert_eq!(written, "Test message\nSecond message\n");
}

#[test]
fn test_custom_suffix_with_and_without_dot() {
    let dir = tempfile::tempdir().unwrap();
    let plain = FileAccessLogReceiver::new(dir.path(), "server", "txt", false).unwrap();
    plain.log_message("a");
    let dotted = FileAccessLogReceiver::new(dir.path(), "other", ".txt", false).unwrap();
    dotted.log_message("b");
    plain.flush();
    dotted.flush();

    assert_eq!(fs::read_to_string(dir.path().join("server.txt")).unwrap(), "a\n");
    assert_eq!(fs::read_to_string(dir.path().join("other.txt")).unwrap(), "b\n");
}

#[test]
fn test_base_name_is_used_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "accesslog.", "log", false).unwrap();
    assert_eq!(receiver.path(), dir.path().join("accesslog..log"));
}

#[test]
fn test_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("logs").join("pet_store");
    let receiver = FileAccessLogReceiver::new(&nested, "access", "log", false).unwrap();
    receiver.log_message("hello");
    receiver.flush();
    assert_eq!(fs::read_to_string(nested.join("access.log")).unwrap(), "hello\n");
}

#[test]
fn test_appends_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");
    fs::write(&path, "earlier\n").unwrap();

    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", false).unwrap();
    receiver.log_message("later");
    receiver.flush();
    assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
}

#[test]
fn test_empty_message_writes_newline() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", false).unwrap();
    receiver.log_message("");
    receiver.flush();
    assert_eq!(fs::read_to_string(dir.path().join("access.log")).unwrap(), "\n");
}

#[test]
fn test_close_drops_later_lines() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", false).unwrap();
    receiver.log_message("kept");
    receiver.close();
    assert!(receiver.is_closed());
    receiver.log_message("dropped");
    receiver.close();

    assert_eq!(fs::read_to_string(dir.path().join("access.log")).unwrap(), "kept\n");
}

#[test]
fn test_forced_rotation_moves_file_aside() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", ".log", true).unwrap();
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

    receiver.log_message("day one");
    let first = receiver.rotate().unwrap().unwrap();
    assert_eq!(first, dir.path().join(format!("access{today}.log")));
    assert_eq!(fs::read_to_string(&first).unwrap(), "day one\n");

    receiver.log_message("day two");
    let second = receiver.rotate().unwrap().unwrap();
    assert_eq!(second, dir.path().join(format!("access{today}-1.log")));
    assert_eq!(fs::read_to_string(&second).unwrap(), "day two\n");

    receiver.log_message("day three");
    receiver.flush();
    assert_eq!(
        fs::read_to_string(dir.path().join("access.log")).unwrap(),
        "day three\n"
    );
}

#[test]
fn test_no_rotation_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", false).unwrap();
    for i in 0..3 {
        receiver.log_message(&format!("line {i}"));
    }
    receiver.flush();
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_handler_logs_to_file_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = format!(
        "enabled: true\npattern: common\nlog_to_file: true\nbase_file_name: pets\n\
         log_directory: {}\nexclude_pattern: \"/health|/metrics\"\n",
        dir.path().display()
    );
    let config = AccessLogConfig::from_yaml_str(&yaml).unwrap();
    let handler = AccessLogHandler::from_config(&config).unwrap().unwrap();

    assert!(handler.log(&pet_listing()));
    let mut health = HttpExchange::builder(Method::GET, "/health").build();
    health.finish(StatusCode::OK, 2);
    assert!(!handler.log(&health));
    drop(handler);

    let written = fs::read_to_string(dir.path().join("pets.log")).unwrap();
    assert_eq!(
        written,
        "192.0.2.10 - - [29/Feb/2024:23:59:58 +0100] \
         \"GET /pets?limit=10&tag=cat&tag=dog HTTP/1.1\" 200 2326\n"
    );
}

#[test]
fn test_combined_pattern_in_memory() {
    let receiver = Arc::new(MemoryAccessLogReceiver::new());
    let handler = AccessLogHandler::new(
        Arc::clone(&receiver) as Arc<dyn AccessLogReceiver>,
        "combined",
        None,
    )
    .unwrap();

    handler.log(&pet_listing());
    let lines = receiver.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("200 2326 \"https://example.com/\" \"curl/8.5.0\""));
}

#[test]
fn test_handler_errors() {
    let receiver: Arc<dyn AccessLogReceiver> = Arc::new(MemoryAccessLogReceiver::new());
    let err = AccessLogHandler::new(Arc::clone(&receiver), "%{i,Host", None).unwrap_err();
    assert!(matches!(err, AccessLogError::Pattern(_)));

    let err = AccessLogHandler::new(receiver, "common", Some("([unclosed")).unwrap_err();
    assert!(matches!(err, AccessLogError::InvalidExcludePattern { .. }));
}

#[test]
fn test_log_directory_must_be_creatable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let err = FileAccessLogReceiver::new(blocker.join("logs"), "access", "log", false)
        .unwrap_err();
    assert!(matches!(err, AccessLogError::Io { .. }));
}

#[test]
fn test_close_drains_queued_lines() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", false).unwrap();
    for i in 0..500 {
        receiver.log_message(&format!("line {i}"));
    }
    receiver.close();

    let written = fs::read_to_string(dir.path().join("access.log")).unwrap();
    let lines: Vec<_> = written.lines().collect();
    assert_eq!(lines.len(), 500);
    assert_eq!(lines[0], "line 0");
    assert_eq!(lines[499], "line 499");
}

#[test]
fn test_lines_from_many_threads_stay_whole() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = Arc::new(
        FileAccessLogReceiver::new(dir.path(), "access", "log", false).unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let receiver = Arc::clone(&receiver);
            std::thread::spawn(move || {
                for i in 0..50 {
                    receiver.log_message(&format!("thread {t} line {i}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    receiver.close();

    let written = fs::read_to_string(dir.path().join("access.log")).unwrap();
    assert_eq!(written.lines().count(), 200);
    assert!(written.lines().all(|line| line.starts_with("thread ")));
}

#[test]
fn test_logging_continues_after_failed_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", true).unwrap();
    receiver.log_message("before");
    receiver.flush();

    // With the file gone there is nothing to rename
    fs::remove_file(dir.path().join("access.log")).unwrap();
    let err = receiver.rotate().unwrap_err();
    assert!(matches!(err, AccessLogError::Io { .. }));

    receiver.log_message("after");
    receiver.close();
    assert_eq!(
        fs::read_to_string(dir.path().join("access.log")).unwrap(),
        "after\n"
    );
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_rotate_after_close_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let receiver = FileAccessLogReceiver::new(dir.path(), "access", "log", true).unwrap();
    receiver.log_message("only line");
    receiver.close();

    assert!(receiver.rotate().unwrap().is_none());
    receiver.log_message("dropped");
    receiver.flush();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("access.log")).unwrap(),
        "only line\n"
    );
    assert!(receiver.is_closed());
}
