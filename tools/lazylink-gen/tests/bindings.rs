// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use lazylink_gen::{generate_bindings, BindingConfig, BindingRequest};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CXSTRING_H: &str = r#"
#ifndef LLVM_CLANG_C_CXSTRING_H
#define LLVM_CLANG_C_CXSTRING_H

#include "clang-c/ExternC.h"
#include "clang-c/Platform.h"

typedef struct {
  const void *data;
  unsigned private_flags;
} CXString;

/**
 * Retrieve the character data associated with the given string.
 */
CINDEX_LINKAGE const char *clang_getCString(CXString string);

/**
 * Free the given string.
 */
CINDEX_LINKAGE void clang_disposeString(CXString string);

#endif
"#;

const INDEX_H: &str = r#"
typedef void *CXIndex;

CINDEX_LINKAGE CXIndex clang_createIndex(int excludeDeclarationsFromPCH,
                                         int displayDiagnostics);

CINDEX_LINKAGE
unsigned
   clang_visitChildrenWithBlock(CXCursor parent,
                                CXCursorVisitorBlock block);

CINDEX_LINKAGE void clang_disposeIndex(CXIndex index);
"#;

fn write_headers(dir: &TempDir) -> Vec<PathBuf> {
    let include = dir.path().join("include/clang-c");
    fs::create_dir_all(&include).unwrap();
    let cxstring = include.join("CXString.h");
    let index = include.join("Index.h");
    fs::write(&cxstring, CXSTRING_H).unwrap();
    fs::write(&index, INDEX_H).unwrap();
    vec![cxstring, index]
}

fn request(dir: &Path, headers: Vec<PathBuf>) -> BindingRequest {
    BindingRequest {
        headers,
        interface: dir.join("gen/libclang.h"),
        logic: dir.join("gen/libclang.cc"),
        config: BindingConfig::default(),
    }
}

#[test]
fn test_generates_both_artifacts() {
    let dir = TempDir::new().unwrap();
    let req = request(dir.path(), write_headers(&dir));

    let report = generate_bindings(&req).unwrap();
    assert_eq!(report.headers_scanned, 2);
    assert_eq!(
        report.apis_bound,
        [
            "clang_getCString",
            "clang_disposeString",
            "clang_createIndex",
            "clang_disposeIndex"
        ]
    );
    assert_eq!(report.files_written, vec![req.interface.clone(), req.logic.clone()]);

    let interface = fs::read_to_string(&req.interface).unwrap();
    assert!(interface.contains("#include \"clang-c/CXString.h\"\n#include \"clang-c/Index.h\"\n"));
    assert!(interface.contains("typedef const char * (*clang_getCString_type)(CXString string);"));
    assert!(interface.contains(
        "typedef CXIndex (*clang_createIndex_type)(int excludeDeclarationsFromPCH, int displayDiagnostics);"
    ));
    assert!(!interface.contains("clang_visitChildrenWithBlock"));

    let logic = fs::read_to_string(&req.logic).unwrap();
    assert!(logic.contains("#include \"libclang.h\"\n"));
    assert!(logic.contains("dlsym(dlhdl, \"clang_createIndex\")"));
    assert!(!logic.contains("clang_visitChildrenWithBlock"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let req = request(dir.path(), write_headers(&dir));

    generate_bindings(&req).unwrap();
    let first = (
        fs::read(&req.interface).unwrap(),
        fs::read(&req.logic).unwrap(),
    );
    generate_bindings(&req).unwrap();
    let second = (
        fs::read(&req.interface).unwrap(),
        fs::read(&req.logic).unwrap(),
    );
    assert_eq!(first, second);
}

#[test]
fn test_header_order_drives_declaration_order() {
    let dir = TempDir::new().unwrap();
    let mut headers = write_headers(&dir);
    headers.reverse();

    let report = generate_bindings(&request(dir.path(), headers)).unwrap();
    assert_eq!(
        report.apis_bound,
        [
            "clang_createIndex",
            "clang_disposeIndex",
            "clang_getCString",
            "clang_disposeString"
        ]
    );
}

#[test]
fn test_missing_header_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut headers = write_headers(&dir);
    headers.push(dir.path().join("include/clang-c/Missing.h"));
    let req = request(dir.path(), headers);

    let err = generate_bindings(&req).unwrap_err();
    assert!(format!("{:#}", err).contains("Missing.h"));
    assert!(!req.interface.exists());
    assert!(!req.logic.exists());
}

#[test]
fn test_parse_error_keeps_previous_artifacts() {
    let dir = TempDir::new().unwrap();
    let headers = write_headers(&dir);
    let req = request(dir.path(), headers.clone());
    generate_bindings(&req).unwrap();
    let before = fs::read_to_string(&req.interface).unwrap();

    let broken = dir.path().join("include/clang-c/Broken.h");
    fs::write(&broken, "CINDEX_LINKAGE int clang_broken;\n").unwrap();
    let mut with_broken = headers;
    with_broken.push(broken);

    let err = generate_bindings(&request(dir.path(), with_broken)).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Broken.h:0"), "{message}");
    assert_eq!(fs::read_to_string(&req.interface).unwrap(), before);
}

#[test]
fn test_config_file_overrides() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("mylib.h");
    fs::write(
        &header,
        "MYLIB_API int mylib_open(const char *path);\nMYLIB_API void mylib_walk(Callback cb);\n",
    )
    .unwrap();
    let config_path = dir.path().join("mylib.yaml");
    fs::write(
        &config_path,
        "marker: MYLIB_API\ndenylist: [Callback]\ninclude_prefix: \"mylib/\"\nwrapper_name: MyLib\ninterface_include: mylib/dyn.h\n",
    )
    .unwrap();

    let req = BindingRequest {
        headers: vec![header],
        interface: dir.path().join("dyn.h"),
        logic: dir.path().join("dyn.cc"),
        config: BindingConfig::from_file(&config_path).unwrap(),
    };
    let report = generate_bindings(&req).unwrap();
    assert_eq!(report.apis_bound, ["mylib_open"]);

    let interface = fs::read_to_string(&req.interface).unwrap();
    assert!(interface.contains("#include \"mylib/mylib.h\""));
    assert!(interface.contains("struct MyLib {"));
    let logic = fs::read_to_string(&req.logic).unwrap();
    assert!(logic.starts_with("// Generated by lazylink-gen. Do not edit.\n#include \"mylib/dyn.h\"\n"));
}
