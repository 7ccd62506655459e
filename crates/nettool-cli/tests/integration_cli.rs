use assert_cmd::Command;
use axum::{Router, http::StatusCode, response::Redirect, routing::get};
use predicates::prelude::*;
use std::io::Write;
use std::net::SocketAddr;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("nettool-cli").unwrap();
    for key in [
        "NETTOOL_CONFIG",
        "NETTOOL_BACKEND_URL",
        "NETTOOL_TIMEOUT_MS",
        "NETTOOL_REQUIRE_IMAGE",
        "NETTOOL_PROXY",
        "NETTOOL_LOG_FILTER",
        "NETTOOL_LOG_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

async fn backend() -> SocketAddr {
    let router = Router::new()
        .route("/ping", get(|| async { Redirect::temporary("/images/ping.png") }))
        .route(
            "/curl_ping_test",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/nodes_image", get(|| async { "nodes" }))
        .route("/images/{name}", get(|| async { "png" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--stdin"));
}

#[test]
fn test_cli_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nettool-cli"));
}

#[test]
fn test_no_arguments_prints_help() {
    cli()
        .assert()
        .code(exitcode::OK)
        .stdout(predicate::str::starts_with("网络工具使用帮助："));
}

#[test]
fn test_missing_node_is_usage_error() {
    cli()
        .args(["ping", "example.com"])
        .assert()
        .code(exitcode::USAGE)
        .stdout(predicate::str::contains("请输入节点！格式：网络工具 ping 地址 节点"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    cli()
        .args(["dig", "example.com", "node1"])
        .assert()
        .code(exitcode::USAGE)
        .stdout("未知命令，请使用\"网络工具\"查看帮助\n");
}

#[test]
fn test_invalid_base_url_is_config_error() {
    cli()
        .args(["--base-url", "not a url", "ping", "example.com", "node1"])
        .assert()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("Config Error"));
}

#[test]
fn test_zero_timeout_is_config_error() {
    cli()
        .args(["--timeout-ms", "0", "节点"])
        .assert()
        .code(exitcode::CONFIG);
}

#[test]
fn test_missing_config_file_is_config_error() {
    cli()
        .args(["--config", "/path/that/does/not/exist.toml", "节点"])
        .assert()
        .code(exitcode::CONFIG);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ping_prints_ack_then_result() {
    let addr = backend().await;

    cli()
        .args(["--base-url", &format!("http://{addr}")])
        .args(["ping", "example.com", "node1"])
        .assert()
        .code(exitcode::OK)
        .stdout(format!(
            "ping 请求已发送，正在执行，请稍等...\nping 结果：http://{addr}/images/ping.png\n"
        ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_error_is_unavailable() {
    let addr = backend().await;

    cli()
        .args(["--base-url", &format!("http://{addr}")])
        .args(["curl", "example.com", "node1"])
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stdout(predicate::str::ends_with("curl 结果 获取失败：服务器返回错误\n"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_backend_is_unavailable() {
    let addr = closed_addr().await;

    cli()
        .args(["--base-url", &format!("http://{addr}")])
        .args(["ping", "example.com", "node1"])
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stdout(predicate::str::contains("ping 结果 获取失败："));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_require_image_rejects_text_response() {
    let addr = backend().await;

    cli()
        .args(["--base-url", &format!("http://{addr}"), "--require-image"])
        .arg("节点列表")
        .assert()
        .code(exitcode::UNAVAILABLE)
        .stdout(predicate::str::contains("节点列表 获取失败：返回内容不是图片"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cq_format_quotes_message() {
    let addr = backend().await;

    cli()
        .args(["--base-url", &format!("http://{addr}")])
        .args(["--format", "cq", "--message-id", "77", "节点"])
        .assert()
        .code(exitcode::OK)
        .stdout(format!(
            "[CQ:reply,id=77]正在获取节点列表，请稍等...\n\
             [CQ:reply,id=77]节点列表：[CQ:image,file=http://{addr}/nodes_image]\n"
        ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_json_format() {
    let addr = backend().await;

    let output = cli()
        .args(["--base-url", &format!("http://{addr}"), "--format", "json"])
        .args(["ping", "example.com", "node1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(exitcode::OK));
    let replies: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["kind"], "text");
    assert_eq!(replies[1]["kind"], "image");
    assert_eq!(replies[1]["caption"], "ping 结果");
    assert_eq!(
        replies[1]["url"],
        format!("http://{addr}/images/ping.png").as_str()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stdin_dispatches_command_lines_only() {
    let addr = backend().await;

    cli()
        .args(["--base-url", &format!("http://{addr}"), "--stdin"])
        .write_stdin("hello there\n.网络工具 ping example.com node1\n\n/网络工具 ping\n")
        .assert()
        .code(exitcode::USAGE)
        .stdout(format!(
            "ping 请求已发送，正在执行，请稍等...\n\
             ping 结果：http://{addr}/images/ping.png\n\
             请输入地址！格式：网络工具 ping 地址 节点\n"
        ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_config_file_sets_backend_and_command_name() {
    let addr = backend().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "[backend]\nbase_url = \"http://{addr}\"\n\n[command]\nname = \"nettool\"\n"
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(file.path())
        .arg("--stdin")
        .write_stdin("网络工具 节点\nnettool 节点\n")
        .assert()
        .code(exitcode::OK)
        .stdout(format!(
            "正在获取节点列表，请稍等...\n节点列表：http://{addr}/nodes_image\n"
        ));
}
