//! `sitepub serve` as a real process.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use predicates::prelude::*;

use super::common::TestEnv;

fn free_port() -> u16 {
  TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}

/// Kills the server when the test ends, pass or fail.
struct ServerProcess(Child);

impl Drop for ServerProcess {
  fn drop(&mut self) {
    let _ = self.0.kill();
    let _ = self.0.wait();
  }
}

fn spawn_server(env: &TestEnv, port: u16) -> ServerProcess {
  let child = Command::new(env!("CARGO_BIN_EXE_sitepub"))
    .args(["serve", "--port", &port.to_string()])
    .envs(env.vars())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .unwrap();
  ServerProcess(child)
}

fn http_get(port: u16, path: &str) -> String {
  let deadline = Instant::now() + Duration::from_secs(10);
  let mut stream = loop {
    match TcpStream::connect(("127.0.0.1", port)) {
      Ok(stream) => break stream,
      Err(_) if Instant::now() < deadline => std::thread::sleep(Duration::from_millis(50)),
      Err(e) => panic!("server never came up on port {port}: {e}"),
    }
  };

  write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
  let mut response = String::new();
  stream.read_to_string(&mut response).unwrap();
  response
}

#[test]
fn serve_without_publish_tree_exits_nonzero() {
  let env = TestEnv::new("true");
  let port = free_port();

  env
    .sitepub_cmd()
    .args(["serve", "--port", &port.to_string()])
    .timeout(Duration::from_secs(10))
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));

  // Nothing is left listening.
  TcpListener::bind(("127.0.0.1", port)).unwrap();
}

#[test]
fn serve_fails_when_port_is_taken() {
  let env = TestEnv::with_publish_tree("true");
  let taken = TcpListener::bind("127.0.0.1:0").unwrap();
  let port = taken.local_addr().unwrap().port();

  env
    .sitepub_cmd()
    .args(["serve", "--port", &port.to_string()])
    .timeout(Duration::from_secs(10))
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to bind"));
}

#[cfg(unix)]
#[test]
fn built_page_is_served() {
  let env = TestEnv::with_publish_tree("mkdir -p output && printf Hello > output/index.html");
  env.sitepub_cmd().arg("build").assert().success();

  let port = free_port();
  let _server = spawn_server(&env, port);

  let response = http_get(port, "/dict/index.html");
  assert!(response.starts_with("HTTP/1.1 200"), "{response}");
  assert!(response.ends_with("Hello"), "{response}");

  let response = http_get(port, "/dict/missing.html");
  assert!(response.starts_with("HTTP/1.1 404"), "{response}");
}

#[cfg(unix)]
#[test]
fn sigterm_stops_the_server_cleanly() {
  let env = TestEnv::with_publish_tree("true");
  env.write_file("site/index.html", "landing");
  let port = free_port();

  let mut server = ServerProcess(
    Command::new(env!("CARGO_BIN_EXE_sitepub"))
      .args(["serve", "--port", &port.to_string()])
      .envs(env.vars())
      .env_remove("RUST_LOG")
      .stdout(Stdio::null())
      .stderr(Stdio::piped())
      .spawn()
      .unwrap(),
  );
  assert!(http_get(port, "/index.html").starts_with("HTTP/1.1 200"));

  let killed = Command::new("kill")
    .args(["-TERM", &server.0.id().to_string()])
    .status()
    .unwrap();
  assert!(killed.success());

  let deadline = Instant::now() + Duration::from_secs(10);
  let status = loop {
    if let Some(status) = server.0.try_wait().unwrap() {
      break status;
    }
    assert!(Instant::now() < deadline, "server ignored SIGTERM");
    std::thread::sleep(Duration::from_millis(50));
  };
  assert!(status.success(), "{status:?}");

  let mut stderr = String::new();
  server.0.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();
  assert!(stderr.contains("preview server stopped"), "{stderr}");

  // The port is released.
  TcpListener::bind(("127.0.0.1", port)).unwrap();
}
