use super::*;
use crate::config::FetchConfig;
use crate::fetcher::{CurlFetcher, DownloadTask, FetchResult, Fetcher, SavedFile};
use crate::orchestrator::{Orchestrator, RunPlan, DEFAULT_URLS};
use crate::testing::{MockResponse, MockServer};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn plan(dir: &Path, urls: Vec<String>) -> RunPlan {
    RunPlan::resolve(Some(dir.to_path_buf()), urls).unwrap()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Server with one good image, one 404, and one route that hangs up.
fn mixed_server() -> MockServer {
    MockServer::start()
        .route("/a.jpg", MockResponse::ok(b"body-a".to_vec()))
        .route("/b.jpg", MockResponse::ok(b"body-b".to_vec()).with_delay(Duration::from_millis(100)))
        .route("/missing.jpg", MockResponse::status(404, Vec::new()))
        .route("/reset.jpg", MockResponse::drop_connection())
}

fn mixed_urls(server: &MockServer) -> Vec<String> {
    vec![
        server.url("/a.jpg"),
        server.url("/missing.jpg"),
        server.url("/reset.jpg"),
        MockServer::unreachable_url("/refused.jpg"),
        server.url("/b.jpg"),
    ]
}

#[test]
fn threads_write_successes_and_skip_failures() {
    let server = mixed_server();
    let dir = tempfile::tempdir().unwrap();
    let runner = ThreadRunner::new(Arc::new(CurlFetcher::default()));

    runner.run(&plan(dir.path(), mixed_urls(&server))).unwrap();

    assert_eq!(files_in(dir.path()), vec!["threading_a.jpg", "threading_b.jpg"]);
    assert_eq!(fs::read(dir.path().join("threading_a.jpg")).unwrap(), b"body-a");
    assert_eq!(fs::read(dir.path().join("threading_b.jpg")).unwrap(), b"body-b");
    assert_eq!(server.hits("/missing.jpg"), 1);
    assert_eq!(server.hits("/reset.jpg"), 1);
}

#[test]
fn async_tasks_write_successes_and_skip_failures() {
    let server = mixed_server();
    let dir = tempfile::tempdir().unwrap();
    let runner = AsyncRunner::new(FetchConfig::default());

    runner.run(&plan(dir.path(), mixed_urls(&server))).unwrap();

    assert_eq!(files_in(dir.path()), vec!["asyncio_a.jpg", "asyncio_b.jpg"]);
    assert_eq!(fs::read(dir.path().join("asyncio_a.jpg")).unwrap(), b"body-a");
    assert_eq!(fs::read(dir.path().join("asyncio_b.jpg")).unwrap(), b"body-b");
}

#[test]
fn rerun_overwrites_with_identical_content() {
    let server = MockServer::start().route("/a.jpg", MockResponse::ok(b"same".to_vec()));
    let dir = tempfile::tempdir().unwrap();
    let p = plan(dir.path(), vec![server.url("/a.jpg")]);

    let threads = ThreadRunner::new(Arc::new(CurlFetcher::default()));
    threads.run(&p).unwrap();
    threads.run(&p).unwrap();
    let tasks = AsyncRunner::new(FetchConfig::default());
    tasks.run(&p).unwrap();
    tasks.run(&p).unwrap();

    assert_eq!(server.hits("/a.jpg"), 4);
    assert_eq!(files_in(dir.path()), vec!["asyncio_a.jpg", "threading_a.jpg"]);
    assert_eq!(fs::read(dir.path().join("threading_a.jpg")).unwrap(), b"same");
    assert_eq!(fs::read(dir.path().join("asyncio_a.jpg")).unwrap(), b"same");
}

#[test]
fn query_variants_do_not_overwrite_each_other() {
    let server = MockServer::start().route("/a.jpg", MockResponse::ok(b"same-path".to_vec()));
    let dir = tempfile::tempdir().unwrap();
    let urls = vec![server.url("/a.jpg?v=1"), server.url("/a.jpg?v=2")];

    ThreadRunner::new(Arc::new(CurlFetcher::default()))
        .run(&plan(dir.path(), urls))
        .unwrap();

    assert_eq!(server.hits("/a.jpg"), 2);
    assert_eq!(
        files_in(dir.path()),
        vec!["threading_a.jpg?v=1", "threading_a.jpg?v=2"]
    );
}

#[test]
fn async_downloads_overlap_on_one_thread() {
    let delay = Duration::from_millis(400);
    let server = MockServer::start()
        .route("/1.jpg", MockResponse::ok(b"1".to_vec()).with_delay(delay))
        .route("/2.jpg", MockResponse::ok(b"2".to_vec()).with_delay(delay))
        .route("/3.jpg", MockResponse::ok(b"3".to_vec()).with_delay(delay));
    let dir = tempfile::tempdir().unwrap();
    let urls = vec![server.url("/1.jpg"), server.url("/2.jpg"), server.url("/3.jpg")];

    let started = Instant::now();
    AsyncRunner::new(FetchConfig::default())
        .run(&plan(dir.path(), urls))
        .unwrap();

    // Serial execution would take at least 3 × delay.
    assert!(started.elapsed() < delay * 3, "took {:?}", started.elapsed());
    assert_eq!(files_in(dir.path()).len(), 3);
}

#[derive(Debug)]
struct Span {
    phase: &'static str,
    url: String,
    start: Instant,
    end: Instant,
}

/// Fetcher that sleeps instead of downloading and records when it ran.
struct Recording {
    phase: &'static str,
    delay: fn(&str) -> Duration,
    log: Arc<Mutex<Vec<Span>>>,
}

impl Fetcher for Recording {
    fn fetch(&self, task: &DownloadTask) -> FetchResult {
        let start = Instant::now();
        std::thread::sleep((self.delay)(&task.url));
        self.log.lock().unwrap().push(Span {
            phase: self.phase,
            url: task.url.clone(),
            start,
            end: Instant::now(),
        });
        Ok(SavedFile {
            path: task.output_path(),
            bytes: 0,
            write_elapsed: Duration::ZERO,
        })
    }
}

fn recording_phase(
    phase: &'static str,
    delay: fn(&str) -> Duration,
    log: &Arc<Mutex<Vec<Span>>>,
) -> Box<dyn Strategy> {
    Box::new(ThreadRunner::new(Arc::new(Recording {
        phase,
        delay,
        log: Arc::clone(log),
    })))
}

#[test]
fn phases_never_overlap() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = Orchestrator::with_phases(vec![
        recording_phase(
            "first",
            |url| Duration::from_millis(if url.ends_with("a.jpg") { 150 } else { 20 }),
            &log,
        ),
        recording_phase("second", |_| Duration::from_millis(60), &log),
        recording_phase("third", |_| Duration::from_millis(10), &log),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let urls = vec!["http://x/a.jpg".to_string(), "http://x/b.jpg".to_string()];

    orchestrator.run(&plan(dir.path(), urls)).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 6);
    let phase_bounds = |phase: &str| {
        let spans: Vec<&Span> = log.iter().filter(|s| s.phase == phase).collect();
        assert_eq!(spans.len(), 2, "{phase}");
        let first_start = spans.iter().map(|s| s.start).min().unwrap();
        let last_end = spans.iter().map(|s| s.end).max().unwrap();
        (first_start, last_end)
    };
    let (_, first_end) = phase_bounds("first");
    let (second_start, second_end) = phase_bounds("second");
    let (third_start, _) = phase_bounds("third");
    assert!(first_end <= second_start);
    assert!(second_end <= third_start);
}

#[test]
fn thread_units_run_in_parallel() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = recording_phase("only", |_| Duration::from_millis(300), &log);
    let dir = tempfile::tempdir().unwrap();
    let urls: Vec<String> = (0..4).map(|i| format!("http://x/{i}.jpg")).collect();

    let started = Instant::now();
    runner.run(&plan(dir.path(), urls)).unwrap();

    assert_eq!(log.lock().unwrap().len(), 4);
    assert!(started.elapsed() < Duration::from_millis(1200));
}

#[test]
fn empty_url_list_downloads_fallback_urls() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = recording_phase("fallback", |_| Duration::ZERO, &log);
    let dir = tempfile::tempdir().unwrap();

    runner.run(&plan(dir.path(), Vec::new())).unwrap();

    let mut seen: Vec<String> = log.lock().unwrap().iter().map(|s| s.url.clone()).collect();
    seen.sort();
    let mut expected: Vec<String> = DEFAULT_URLS.iter().map(|u| u.to_string()).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn worker_command_appends_task() {
    let worker = WorkerCommand::new("/usr/bin/imgdl").arg("fetch-worker");
    let task = DownloadTask::new("http://x/a.jpg", "/out", MULTIPROCESSING_PREFIX);

    let cmd = worker.command_for(&task);

    assert_eq!(cmd.get_program(), "/usr/bin/imgdl");
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(
        args,
        vec!["fetch-worker", "--prefix", "multiprocessing_", "http://x/a.jpg", "/out"]
    );
}

#[test]
fn unstartable_worker_fails_the_phase() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ProcessRunner::new(WorkerCommand::new(dir.path().join("no-such-worker")));

    let err = runner
        .run(&plan(dir.path(), vec!["http://x/a.jpg".into()]))
        .unwrap_err();

    assert!(format!("{err:#}").contains("failed to start worker for http://x/a.jpg"));
}
