#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process::{Command, Output};

    fn bin() -> Command {
        Command::new(env!("CARGO_BIN_EXE_blockzip"))
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blockzip-cli-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn stderr(out: &Output) -> String {
        String::from_utf8_lossy(&out.stderr).into_owned()
    }

    #[test]
    fn compress_then_decompress_restores_file() {
        let dir = scratch("roundtrip");
        let src = dir.join("input.txt");
        let packed = dir.join("input.bz");
        let restored = dir.join("restored.txt");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data).unwrap();

        let out = bin()
            .args(["compress", src.to_str().unwrap(), packed.to_str().unwrap(), "--block-size", "8192", "--workers", "3"])
            .output()
            .unwrap();
        assert!(out.status.success(), "{}", stderr(&out));

        let out = bin()
            .args(["decompress", packed.to_str().unwrap(), restored.to_str().unwrap()])
            .output()
            .unwrap();
        assert!(out.status.success(), "{}", stderr(&out));
        assert_eq!(fs::read(&restored).unwrap(), data);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn command_is_case_insensitive() {
        let dir = scratch("case");
        let src = dir.join("a");
        let packed = dir.join("a.bz");
        fs::write(&src, b"hello").unwrap();

        let out = bin()
            .args(["COMPRESS", src.to_str().unwrap(), packed.to_str().unwrap()])
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));

        let out = bin()
            .args(["DeCompress", packed.to_str().unwrap(), dir.join("b").to_str().unwrap()])
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
        assert_eq!(fs::read(dir.join("b")).unwrap(), b"hello");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_file_stays_empty() {
        let dir = scratch("empty");
        let src = dir.join("empty");
        let packed = dir.join("empty.bz");
        let restored = dir.join("restored");
        fs::write(&src, b"").unwrap();

        assert!(bin().args(["compress", src.to_str().unwrap(), packed.to_str().unwrap()]).status().unwrap().success());
        assert_eq!(fs::metadata(&packed).unwrap().len(), 0);
        assert!(bin().args(["decompress", packed.to_str().unwrap(), restored.to_str().unwrap()]).status().unwrap().success());
        assert_eq!(fs::metadata(&restored).unwrap().len(), 0);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_arguments_exit_1() {
        let out = bin().args(["compress", "only-source"]).output().unwrap();
        assert_eq!(out.status.code(), Some(1));
        assert!(stderr(&out).contains("The required arguments are missing."));
    }

    #[test]
    fn unknown_command_exits_1() {
        let out = bin().args(["shrink", "a", "b"]).output().unwrap();
        assert_eq!(out.status.code(), Some(1));
        assert_eq!(stderr(&out).trim(), "The specified command is invalid.");
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let dir = scratch("extra");
        let src = dir.join("in");
        let packed = dir.join("in.bz");
        fs::write(&src, b"some bytes to pack").unwrap();

        let out = bin()
            .args(["compress", src.to_str().unwrap(), packed.to_str().unwrap(), "surplus", "more"])
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
        assert!(packed.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn help_exits_0() {
        let out = bin().arg("--help").output().unwrap();
        assert_eq!(out.status.code(), Some(0));
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = scratch("nosrc");
        let out = bin()
            .args(["compress", dir.join("absent").to_str().unwrap(), dir.join("out").to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert_eq!(stderr(&out).trim(), "The source file cannot be found.");
        assert!(!dir.join("out").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn source_in_missing_directory_is_an_invalid_path() {
        let dir = scratch("nosrcdir");
        let out = bin()
            .args(["compress", dir.join("no/such/dir/in").to_str().unwrap(), dir.join("out").to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert!(stderr(&out).starts_with("The specified path is invalid"), "{}", stderr(&out));
        assert!(!dir.join("out").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_destination_directory_is_reported() {
        let dir = scratch("nodest");
        let src = dir.join("in");
        fs::write(&src, b"data").unwrap();

        let out = bin()
            .args(["compress", src.to_str().unwrap(), dir.join("no/such/dir/out").to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert!(stderr(&out).contains("The specified path is invalid"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn directory_source_is_not_a_file() {
        let dir = scratch("dirsrc");
        let out = bin()
            .args(["compress", dir.to_str().unwrap(), dir.join("out").to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert_eq!(stderr(&out).trim(), "Path refers to the non-file device.");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_input_reports_inner_cause() {
        let dir = scratch("corrupt");
        let src = dir.join("garbage.bz");
        // position 0, length 4, payload that is not gzip
        fs::write(&src, [0, 0, 0, 0, 0, 0, 0, 4, 1, 2, 3, 4]).unwrap();

        let out = bin()
            .args(["decompress", src.to_str().unwrap(), dir.join("out").to_str().unwrap()])
            .output()
            .unwrap();

        assert_eq!(out.status.code(), Some(1));
        assert!(stderr(&out).contains("gzip"), "{}", stderr(&out));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn stats_prints_json() {
        let dir = scratch("stats");
        let src = dir.join("in");
        fs::write(&src, vec![b'x'; 10_000]).unwrap();

        let out = bin()
            .args(["compress", src.to_str().unwrap(), dir.join("out").to_str().unwrap(), "--stats", "-b", "1000"])
            .output()
            .unwrap();

        assert!(out.status.success());
        let json: serde_json::Value = serde_json::from_str(stderr(&out).trim()).unwrap();
        assert_eq!(json["blocks_read"], 10);
        assert_eq!(json["bytes_in"], 10_000);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn invalid_level_is_rejected() {
        let dir = scratch("level");
        let src = dir.join("in");
        fs::write(&src, b"abc").unwrap();

        let out = bin()
            .args(["compress", src.to_str().unwrap(), dir.join("out").to_str().unwrap(), "--level", "12"])
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(1));
        let _ = fs::remove_dir_all(dir);
    }
}
