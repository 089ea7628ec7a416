//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 -> writer -> 文件输出 的端到端验证
//! - 多层 writer 组合
//! - 部分失败场景

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::net::UdpSocket;
    use std::path::Path;
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{row, Layout, RowSink, TableError, Value};
    use multiplexer::{create_writer, MemorySink, MultiplexedWriter, PrefixedSink, WriterError};

    fn config_toml(dir: &Path, udp_addr: &str) -> String {
        format!(
            r#"
name = "ratings"

[layout]
columns = ["user", "item", "rating"]

[[sinks]]
name = "console"
sink_type = "log"

[[sinks]]
name = "csv_out"
sink_type = "csv"
[sinks.params]
path = "{dir}/out/ratings.csv"

[[sinks]]
name = "tsv_out"
sink_type = "tsv"
[sinks.params]
path = "{dir}/out/ratings.tsv"
header = "false"

[[sinks]]
name = "jsonl_out"
sink_type = "json_lines"
[sinks.params]
path = "{dir}/out/ratings.jsonl"

[[sinks]]
name = "udp_out"
sink_type = "network"
[sinks.params]
addr = "{udp_addr}"
"#,
            dir = dir.display(),
            udp_addr = udp_addr,
        )
    }

    /// End-to-end test: TOML config -> create_writer -> every sink kind
    #[test]
    fn test_e2e_config_to_files() {
        let dir = tempfile::tempdir().unwrap();
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let udp_addr = receiver.local_addr().unwrap().to_string();

        let config =
            ConfigLoader::load_from_str(&config_toml(dir.path(), &udp_addr), ConfigFormat::Toml)
                .unwrap();
        let mut configured = create_writer(&config).unwrap();
        assert_eq!(configured.writer.len(), 5);

        configured.writer.write_row(&row!["u1", "i9", 4.5]).unwrap();
        configured
            .writer
            .write_values(vec![Value::from("u2"), Value::from("i, 7"), Value::Null])
            .unwrap();
        configured.writer.close().unwrap();

        let out = dir.path().join("out");
        assert_eq!(
            fs::read_to_string(out.join("ratings.csv")).unwrap(),
            "user,item,rating\nu1,i9,4.5\nu2,\"i, 7\",\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("ratings.tsv")).unwrap(),
            "u1\ti9\t4.5\nu2\ti, 7\t\n"
        );

        let jsonl = fs::read_to_string(out.join("ratings.jsonl")).unwrap();
        let parsed: Vec<serde_json::Value> = jsonl
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["rating"], 4.5);
        assert!(parsed[1]["rating"].is_null());

        let mut buf = [0u8; 512];
        let n = receiver.recv(&mut buf).unwrap();
        let first: serde_json::Value = serde_json::from_slice(&buf[..n]).unwrap();
        assert_eq!(first["user"], "u1");

        for (name, snapshot) in configured.metrics() {
            assert_eq!(snapshot.write_count, 2, "sink {name}");
            assert_eq!(snapshot.close_count, 1, "sink {name}");
        }
    }

    /// A bad row stops at the first sink that rejects it
    #[test]
    fn test_e2e_arity_error_stops_broadcast() {
        let layout = Layout::new(["a", "b"]).unwrap();
        let narrow = Layout::new(["a"]).unwrap();

        let first = MemorySink::new("first", layout.clone());
        let strict = MemorySink::new("narrow", narrow);
        let last = MemorySink::new("last", layout.clone());
        let (t_first, t_last) = (first.table(), last.table());

        let mut writer = MultiplexedWriter::new(
            layout,
            vec![Box::new(first), Box::new(strict), Box::new(last)],
        );

        let err = writer.write_row(&row![1, 2]).unwrap_err();
        assert!(matches!(err, TableError::RowArity { .. }));
        assert_eq!(err.sink_name(), Some("narrow"));
        assert_eq!(t_first.len(), 1);
        assert!(t_last.is_empty());

        writer.close().unwrap();
        assert!(t_first.is_closed() && t_last.is_closed());
    }

    /// Closing an already-closed member is reported, later members still close
    #[test]
    fn test_e2e_close_reports_first_failure() {
        let layout = Layout::new(["a"]).unwrap();
        let mut early = MemorySink::new("early", layout.clone());
        early.close().unwrap();
        let mut middle = MemorySink::new("middle", layout.clone());
        middle.close().unwrap();
        let tail = MemorySink::new("tail", layout.clone());
        let t_tail = tail.table();

        let mut writer = MultiplexedWriter::new(
            layout,
            vec![Box::new(early), Box::new(middle), Box::new(tail)],
        );

        let err = writer.close().unwrap_err();
        assert_eq!(err.sink_name(), Some("early"));
        assert!(t_tail.is_closed());
    }

    /// Writers nest, and prefixed sinks tag rows for a shared table
    #[test]
    fn test_e2e_nested_and_prefixed() {
        let full = Layout::new(["run", "user", "score"]).unwrap();
        let shared = MemorySink::new("shared", full.clone());
        let audit = MemorySink::new("audit", full);
        let (t_shared, t_audit) = (shared.table(), audit.table());

        let prefixed_shared = PrefixedSink::new(shared, vec![Value::from("run-1")]).unwrap();
        let prefixed_audit = PrefixedSink::new(audit, vec![Value::from("run-1")]).unwrap();
        let run_layout = prefixed_shared.layout().clone();

        let inner = MultiplexedWriter::with_layout_check(
            run_layout.clone(),
            vec![Box::new(prefixed_audit)],
        )
        .unwrap()
        .named("audit_group");

        let mut outer = MultiplexedWriter::with_layout_check(
            run_layout,
            vec![Box::new(prefixed_shared), Box::new(inner)],
        )
        .unwrap();

        outer.write_row(&row!["alice", 0.75]).unwrap();
        outer.flush().unwrap();
        outer.close().unwrap();

        let expected = vec![row!["run-1", "alice", 0.75]];
        assert_eq!(t_shared.rows(), expected);
        assert_eq!(t_audit.rows(), expected);
        assert_eq!(t_audit.flush_count(), 1);
        assert!(t_shared.is_closed() && t_audit.is_closed());
    }

    /// Sink build failure surfaces as a creation error naming the sink
    #[test]
    fn test_e2e_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // The path is an existing directory, so the file cannot be created
        let content = format!(
            r#"
[layout]
columns = ["a"]

[[sinks]]
name = "ok"
sink_type = "log"

[[sinks]]
name = "blocked"
sink_type = "csv"
params = {{ path = "{}" }}
"#,
            dir.path().display()
        );
        let config = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();

        match create_writer(&config) {
            Err(WriterError::SinkCreation { name, .. }) => assert_eq!(name, "blocked"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected sink creation to fail"),
        }
    }
}
