//! Batch-loop behavior: resume, skip semantics, caps and failure
//! isolation, exercised through the real CSV sheet and checkpoint store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use gpa_collector::services::result_sink::{COL_GPA, COL_LINK, COL_STATUS};
use gpa_collector::{
    App, CheckpointStore, Config, CsvSheet, PageFetcher, ScrapeError, SheetStore,
};

/// Serves canned HTML per URL and records every fetch.
struct MockFetcher {
    pages: HashMap<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    fn new(pages: &[(&str, String)]) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let fetcher = Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.clone()))
                .collect(),
            calls: calls.clone(),
        };
        (fetcher, calls)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::transient_fetch(url, "page not available"))
    }
}

/// Score page with GPA 3.22 and grades only for HK1 (2025 - 2026), so the
/// default target semester HK2 (2025 - 2026) is absent.
fn score_page() -> String {
    r#"<html><body>
        <table id="xemDiem">
            <tr><td colspan="10">HK1 (2025 - 2026)</td></tr>
            <tr><td>1</td><td>0101000111</td><td>Giải tích</td><td>3</td><td>.</td>
                <td title="DiemTongKet">7,5</td><td>B</td><td>.</td><td>.</td></tr>
            <tr><td>2</td><td>0101000222</td><td>Vật lý đại cương</td><td>2</td><td>.</td>
                <td title="DiemTongKet">8,0</td><td>A</td><td>.</td><td>.</td></tr>
        </table>
        <table><tr>
            <td class="text-start">Trung bình chung tích lũy: </td>
            <td><span>8,05</span> - <span>3,22</span> 30</td>
        </tr></table>
    </body></html>"#
        .to_string()
}

const ROSTER_HEADER: &str = "MSSV,Họ đệm,Tên,Lớp,Link,GPA,Điểm KL,Trạng thái";

/// One roster CSV row: (id, name, url, status).
fn roster_row(id: &str, name: &str, url: &str, status: &str) -> String {
    format!("{},{},,14DHTH,{},,,{}", id, name, url, status)
}

struct TestEnv {
    _dir: tempfile::TempDir,
    roster_path: PathBuf,
    checkpoint_path: PathBuf,
}

impl TestEnv {
    fn new(rows: &[String]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let roster_path = dir.path().join("roster.csv");
        let checkpoint_path = dir.path().join("checkpoint.json");
        let contents = format!("{}\n{}\n", ROSTER_HEADER, rows.join("\n"));
        std::fs::write(&roster_path, contents).expect("write roster");
        Self { _dir: dir, roster_path, checkpoint_path }
    }

    fn config(&self) -> Config {
        Config {
            roster_path: self.roster_path.display().to_string(),
            checkpoint_path: self.checkpoint_path.display().to_string(),
            delay_between_students_secs: 0.0,
            ..Config::default()
        }
    }

    fn sheet(&self) -> CsvSheet {
        CsvSheet::open(&self.roster_path).expect("open roster")
    }

    fn checkpoints(&self) -> CheckpointStore {
        CheckpointStore::new(&self.checkpoint_path)
    }
}

#[tokio::test]
async fn processed_row_lands_in_sheet_and_checkpoint() {
    let url = "https://portal.test/diem/1";
    let env = TestEnv::new(&[roster_row("2001215800", "Nguyễn An", url, "")]);
    let (fetcher, calls) = MockFetcher::new(&[(url, score_page())]);

    let mut app = App::with_parts(env.config(), fetcher, env.sheet());
    let counts = app.run().await.expect("run");

    assert_eq!(counts.success, 1);
    assert_eq!(counts.failed, 0);
    assert_eq!(counts.skipped, 0);
    assert_eq!(calls.lock().unwrap().len(), 1);

    let sheet = env.sheet();
    assert_eq!(sheet.read_cell(2, COL_LINK), Some(url));
    assert_eq!(sheet.read_cell(2, COL_GPA), Some("3.22"));
    assert_eq!(sheet.read_cell(2, COL_STATUS), Some("Chưa đăng ký"));

    let checkpoint = env.checkpoints().load().expect("checkpoint written");
    assert_eq!(checkpoint.last_processed_index, 2);
    assert_eq!(checkpoint.last_processed_id, "2001215800");
    assert_eq!(checkpoint.counts.success, 1);
}

#[tokio::test]
async fn rows_with_a_status_are_never_fetched_unless_forced() {
    let url = "https://portal.test/diem/1";
    let env = TestEnv::new(&[roster_row("2001215800", "Nguyễn An", url, "Có điểm")]);

    // default: the filled status cell wins
    let (fetcher, calls) = MockFetcher::new(&[(url, score_page())]);
    let mut app = App::with_parts(env.config(), fetcher, env.sheet());
    let counts = app.run().await.expect("run");

    assert_eq!(counts.skipped, 1);
    assert_eq!(counts.success, 0);
    assert!(calls.lock().unwrap().is_empty());

    // forced: the same row is fetched again
    let (fetcher, calls) = MockFetcher::new(&[(url, score_page())]);
    let config = Config { force_reprocess: true, ..env.config() };
    let mut app = App::with_parts(config, fetcher, env.sheet());
    let counts = app.run().await.expect("run");

    assert_eq!(counts.success, 1);
    assert_eq!(counts.skipped, 0);
    assert_eq!(calls.lock().unwrap().as_slice(), [url.to_string()]);
}

#[tokio::test]
async fn resume_never_refetches_completed_rows() {
    let urls = [
        "https://portal.test/diem/1",
        "https://portal.test/diem/2",
        "https://portal.test/diem/3",
    ];
    let env = TestEnv::new(&[
        roster_row("2001215800", "Nguyễn An", urls[0], ""),
        roster_row("2001215801", "Trần Bình", urls[1], ""),
        roster_row("2001215802", "Lê Chi", urls[2], ""),
    ]);

    // a previous run completed rows 2 and 3
    env.checkpoints()
        .save(&gpa_collector::CheckpointRecord::new(
            3,
            "2001215801",
            gpa_collector::RunCounts { success: 2, failed: 0, skipped: 0 },
        ))
        .expect("seed checkpoint");

    let pages: Vec<(&str, String)> = urls.iter().map(|u| (*u, score_page())).collect();
    let (fetcher, calls) = MockFetcher::new(&pages);
    let mut app = App::with_parts(env.config(), fetcher, env.sheet());
    let counts = app.run().await.expect("run");

    assert_eq!(calls.lock().unwrap().as_slice(), [urls[2].to_string()]);
    // the tally carries on from the checkpoint
    assert_eq!(counts.success, 3);

    let checkpoint = env.checkpoints().load().expect("checkpoint");
    assert_eq!(checkpoint.last_processed_index, 4);
    assert_eq!(checkpoint.last_processed_id, "2001215802");
}

#[tokio::test]
async fn test_limit_counts_only_newly_processed_students() {
    let urls = ["https://portal.test/diem/2", "https://portal.test/diem/3"];
    let env = TestEnv::new(&[
        roster_row("2001215800", "Nguyễn An", "https://portal.test/diem/1", "Có điểm"),
        roster_row("2001215801", "Trần Bình", urls[0], ""),
        roster_row("2001215802", "Lê Chi", urls[1], ""),
    ]);

    let pages: Vec<(&str, String)> = urls.iter().map(|u| (*u, score_page())).collect();
    let (fetcher, calls) = MockFetcher::new(&pages);
    let config = Config { test_limit: Some(1), ..env.config() };
    let mut app = App::with_parts(config, fetcher, env.sheet());
    let counts = app.run().await.expect("run");

    // the skipped first row does not consume the cap
    assert_eq!(counts.skipped, 1);
    assert_eq!(counts.success, 1);
    assert_eq!(calls.lock().unwrap().as_slice(), [urls[0].to_string()]);
}

#[tokio::test]
async fn one_broken_student_never_stops_the_batch() {
    let bad_url = "https://portal.test/diem/1";
    let good_url = "https://portal.test/diem/3";
    let env = TestEnv::new(&[
        roster_row("2001215800", "Nguyễn An", bad_url, ""),
        roster_row("2001215801", "Trần Bình", "", ""),
        roster_row("2001215802", "Lê Chi", good_url, ""),
    ]);

    // bad_url is not served, so its fetch fails; the second row has no
    // link at all and fails without a fetch
    let (fetcher, calls) = MockFetcher::new(&[(good_url, score_page())]);
    let mut app = App::with_parts(env.config(), fetcher, env.sheet());
    let counts = app.run().await.expect("run");

    assert_eq!(counts.failed, 2);
    assert_eq!(counts.success, 1);
    assert_eq!(
        calls.lock().unwrap().as_slice(),
        [bad_url.to_string(), good_url.to_string()]
    );

    let sheet = env.sheet();
    assert_eq!(sheet.read_cell(4, COL_STATUS), Some("Chưa đăng ký"));
    let checkpoint = env.checkpoints().load().expect("checkpoint");
    assert_eq!(checkpoint.last_processed_index, 4);
}
