use serde_json::Value;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const FEED: &str = r#"[
  {
    "id": "p1",
    "title": "apple pie",
    "content": "Grandma's recipe, any tips for the crust?",
    "author": "lee",
    "created_at": "2024-05-01T09:30:00",
    "ai_answer": "Keep the butter cold.",
    "like_count": 2,
    "comment_count": 4,
    "comments": [
      {"id": "c1", "content": "Use lard", "author": "park", "created_at": "2024-05-01T10:00:00"},
      {"id": "c2", "parent_id": "c1", "content": "Butter is better", "author": "kim",
       "created_at": "2024-05-01T10:05:00", "ai_reply": "Both work."},
      {"id": "c3", "parent_id": "c404", "content": "Lost reply", "author": "choi",
       "created_at": "2024-05-01T10:07:00"},
      {"id": "c4", "parent_id": "c2", "content": "Agreed", "author": "lee",
       "created_at": "2024-05-01T10:09:00"}
    ]
  },
  {
    "id": "p2",
    "title": "banana bread",
    "content": "Too dry every time",
    "author": "kim",
    "created_at": "2024-05-02T08:00:00Z"
  },
  {
    "id": "p3",
    "content": "missing title",
    "author": "kim",
    "created_at": "2024-05-02T08:00:00Z"
  }
]"#;

/// Helper struct to manage test environment
struct TestEnv {
    _temp_dir: TempDir,
    work_dir: PathBuf,
    binary_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().to_path_buf();
        std::fs::write(work_dir.join("feed.json"), FEED).expect("Failed to write feed fixture");

        Self {
            _temp_dir: temp_dir,
            work_dir,
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_tb")),
        }
    }

    /// Run a tb command and return stdout, or stderr on failure
    fn run(&self, args: &[&str]) -> Result<String, String> {
        self.run_full(args)
            .map(|(stdout, _)| stdout)
    }

    /// Run a tb command and return (stdout, stderr) on success
    fn run_full(&self, args: &[&str]) -> Result<(String, String), String> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .expect("Failed to execute tb command");

        if output.status.success() {
            Ok((
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.work_dir.join(name), content).expect("Failed to write file");
    }

    fn config_exists(&self) -> bool {
        self.work_dir
            .join(".threadboard")
            .join("config.toml")
            .exists()
    }
}

#[test]
fn test_init_creates_config() {
    let env = TestEnv::new();
    assert!(!env.config_exists());

    let output = env.run(&["init"]).expect("Init command failed");
    assert!(output.contains("Initialized threadboard"));
    assert!(env.config_exists());

    let output = env.run(&["init"]).expect("Second init failed");
    assert!(output.contains("already initialized"));
}

#[test]
fn test_feed_lists_posts_and_reports_skipped() {
    let env = TestEnv::new();

    let (stdout, stderr) = env.run_full(&["feed", "feed.json"]).expect("Feed failed");
    assert!(stdout.contains("p1"));
    assert!(stdout.contains("apple pie"));
    assert!(stdout.contains("banana bread"));
    assert!(stdout.contains("[unliked]"));
    assert!(stdout.contains("Likes: 2  Comments: 4"));
    assert!(!stdout.contains("missing title"));
    assert!(stderr.contains("Skipped record:"));
    assert!(stderr.contains("missing required field `title`"));
}

#[test]
fn test_feed_query_is_case_sensitive() {
    let env = TestEnv::new();

    let output = env
        .run(&["feed", "feed.json", "--query", "banana"])
        .expect("Feed failed");
    assert!(output.contains("banana bread"));
    assert!(!output.contains("apple pie"));
    assert!(output.contains("1 of 2 posts match."));

    let output = env
        .run(&["feed", "feed.json", "--query", "Banana"])
        .expect("Feed failed");
    assert!(output.contains("No posts found."));
}

#[test]
fn test_feed_json_output() {
    let env = TestEnv::new();

    let output = env
        .run(&["feed", "feed.json", "--json"])
        .expect("Feed failed");
    let listing: Value = serde_json::from_str(&output).expect("Invalid JSON");

    assert_eq!(listing["total"], 2);
    let posts = listing["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], "p1");
    assert_eq!(posts[1]["like_count"], 0);
    assert_eq!(posts[1]["summation"], "Too dry every time");
    assert_eq!(posts[1]["liked"], false);
}

#[test]
fn test_thread_renders_nested_comments() {
    let env = TestEnv::new();

    let output = env
        .run(&["thread", "feed.json", "p1"])
        .expect("Thread failed");
    assert!(output.contains("Post: p1"));
    assert!(output.contains("Keep the butter cold."));
    assert!(output.contains("Comments: (4)"));
    assert!(output.contains("AI: Both work."));

    let c1 = output.find("#c1").expect("c1 missing");
    let c2 = output.find("#c2").expect("c2 missing");
    let c4 = output.find("#c4").expect("c4 missing");
    let c3 = output.find("#c3").expect("c3 missing");
    assert!(c1 < c2 && c2 < c4 && c4 < c3, "comments out of display order");

    let concise = env
        .run(&["thread", "feed.json", "p1", "--concise"])
        .expect("Thread failed");
    assert!(!concise.contains("AI: Both work."));
}

#[test]
fn test_thread_json_is_nested() {
    let env = TestEnv::new();

    let output = env
        .run(&["thread", "feed.json", "p1", "--json"])
        .expect("Thread failed");
    let post: Value = serde_json::from_str(&output).expect("Invalid JSON");

    let roots = post["comments"].as_array().unwrap();
    let root_ids: Vec<&str> = roots.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(root_ids, vec!["c1", "c3"]);
    assert_eq!(roots[0]["children"][0]["id"], "c2");
    assert_eq!(roots[0]["children"][0]["children"][0]["id"], "c4");
}

#[test]
fn test_thread_focus_on_comment() {
    let env = TestEnv::new();

    let output = env
        .run(&["thread", "feed.json", "p1", "--comment", "c2", "--json"])
        .expect("Thread failed");
    let comment: Value = serde_json::from_str(&output).expect("Invalid JSON");
    assert_eq!(comment["id"], "c2");
    assert_eq!(comment["children"][0]["id"], "c4");

    let result = env.run(&["thread", "feed.json", "p1", "--comment", "c99"]);
    assert!(result.unwrap_err().contains("Comment not found: c99"));
}

#[test]
fn test_thread_unknown_post_suggests() {
    let env = TestEnv::new();

    let result = env.run(&["thread", "feed.json", "p7"]);
    let err = result.unwrap_err();
    assert!(err.contains("Post not found: p7"));
    assert!(err.contains("Did you mean:"));
}

#[test]
fn test_thread_reads_single_post_object() {
    let env = TestEnv::new();
    env.write(
        "detail.json",
        r#"{"id": "p9", "title": "solo", "content": "one post", "author": "lee",
            "created_at": "2024-05-01T09:30:00Z"}"#,
    );

    let output = env
        .run(&["thread", "detail.json", "p9"])
        .expect("Thread failed");
    assert!(output.contains("solo"));
    assert!(output.contains("(none yet)"));
}

#[test]
fn test_malformed_body_fails() {
    let env = TestEnv::new();
    env.write("broken.json", "{not json");

    let result = env.run(&["feed", "broken.json"]);
    assert!(result.unwrap_err().contains("malformed response body"));

    let result = env.run(&["feed", "missing.json"]);
    assert!(result.unwrap_err().contains("Failed to read"));
}

#[test]
fn test_draft_post_uses_config_endpoint() {
    let env = TestEnv::new();

    let output = env
        .run(&[
            "draft", "post", "--title", "hello", "--content", "first", "--author", "kim",
        ])
        .expect("Draft failed");
    assert!(output.contains("POST http://localhost:8080/posts"));

    env.run(&["init"]).expect("Init failed");
    env.write(
        ".threadboard/config.toml",
        "server = \"board.example\"\nport = 9000\n",
    );
    let output = env
        .run(&["draft", "comment", "p1", "nice recipe"])
        .expect("Draft failed");
    assert!(output.contains("POST http://board.example:9000/comments"));
    assert!(output.contains("\"post_id\": \"p1\""));
}

#[test]
fn test_draft_json_and_validation() {
    let env = TestEnv::new();

    let output = env
        .run(&["draft", "comment", "p1", "hi there", "--json"])
        .expect("Draft failed");
    let body: Value = serde_json::from_str(&output).expect("Invalid JSON");
    assert_eq!(body["post_id"], "p1");
    assert_eq!(body["content"], "hi there");

    let result = env.run(&[
        "draft", "post", "--title", "  ", "--content", "x", "--author", "kim",
    ]);
    assert!(result.unwrap_err().contains("`title` must not be blank"));
}

#[test]
fn test_thread_survives_bad_comment_record() {
    let env = TestEnv::new();
    env.write(
        "partial.json",
        r#"{"id": "p5", "title": "crust", "content": "help", "author": "lee",
            "created_at": "2024-05-01T09:30:00Z",
            "comments": [
              {"id": "c1", "content": "Use lard", "author": "park", "created_at": "2024-05-01T10:00:00Z"},
              {"id": "c2", "content": "no author here", "created_at": "2024-05-01T10:01:00Z"},
              {"id": "c1", "content": "repeat", "author": "kim", "created_at": "2024-05-01T10:02:00Z"}
            ]}"#,
    );

    let (stdout, stderr) = env
        .run_full(&["thread", "partial.json", "p5"])
        .expect("Thread failed");
    assert!(stdout.contains("Post: p5"));
    assert!(stdout.contains("Use lard"));
    assert!(!stdout.contains("repeat"));
    assert!(stderr.contains("missing required field `author`"));
    assert!(stderr.contains("Skipped record:"));
}
