//! Shared fixtures: a Go project in a temp dir plus a fake `go` oracle.
//!
//! The oracle is a shell script named `list` in the project directory. The
//! resolver runs `<go_binary> list -m -e -json all` from that directory, so
//! using `sh` as the binary executes the script with the usual arguments.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use golicense_checkr::resolver::GoListResolver;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const MIT_TEXT: &str = "MIT License

Copyright (c) 2023 Example Authors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
";

pub const GPL2_HEADER: &str = "                    GNU GENERAL PUBLIC LICENSE
                       Version 2, June 1991

 Copyright (C) 1989, 1991 Free Software Foundation, Inc.
";

pub struct GoProject {
    dir: TempDir,
}

impl GoProject {
    pub fn new(go_mod: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), go_mod).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn go_mod(&self) -> PathBuf {
        self.path().join("go.mod")
    }

    /// Create a fake module cache directory for `name`.
    pub fn module_dir(&self, name: &str) -> PathBuf {
        let dir = self.path().join("modcache").join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn write_file(&self, dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    /// Install an oracle running `body` as a shell script.
    pub fn oracle_script(&self, body: &str) {
        fs::write(self.path().join("list"), body).unwrap();
    }

    /// Install an oracle printing `records` as concatenated JSON objects.
    pub fn oracle_records(&self, records: &[Value]) {
        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string_pretty(record).unwrap());
            out.push('\n');
        }
        self.oracle_script(&format!("cat <<'GOLIST_EOF'\n{out}GOLIST_EOF\n"));
    }

    pub fn resolver(&self) -> GoListResolver {
        GoListResolver::new("sh").offline(false)
    }
}

pub fn record(path: &str, version: &str, dir: &Path) -> Value {
    json!({
        "Path": path,
        "Version": version,
        "Dir": dir.display().to_string(),
    })
}

pub fn main_record(path: &str, dir: &Path) -> Value {
    json!({
        "Path": path,
        "Main": true,
        "Dir": dir.display().to_string(),
    })
}

/// `example.com/app` requiring `a` (direct, MIT) and `b` (indirect, no license file).
pub fn app_with_a_and_b() -> GoProject {
    let project = GoProject::new(
        "module example.com/app

go 1.21

require (
\texample.com/a v1.0.0
\texample.com/b v2.0.0 // indirect
)
",
    );
    let a = project.module_dir("a");
    project.write_file(&a, "LICENSE", MIT_TEXT);
    let b = project.module_dir("b");
    project.write_file(&b, "README.md", "no license here\n");
    project.oracle_records(&[
        main_record("example.com/app", project.path()),
        record("example.com/a", "v1.0.0", &a),
        record("example.com/b", "v2.0.0", &b),
    ]);
    project
}
