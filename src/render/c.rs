//! C target language support. The only built-in target with more than
//! one output file: a source file and a header, in that order.

use super::{OutputFileInfo, TargetLanguage};

pub fn target() -> TargetLanguage {
    TargetLanguage {
        key: "c",
        name: "C",
        output_files: vec![
            OutputFileInfo {
                name: "source file",
                default_path: "cligen.c",
                template_name: "c.c.j2",
                template_source: include_str!("../../templates/c.c.j2"),
                begin_marker: "/* cligen: begin generated code */",
                end_marker: "/* cligen: end generated code */",
            },
            OutputFileInfo {
                name: "header file",
                default_path: "cligen.h",
                template_name: "c.h.j2",
                template_source: include_str!("../../templates/c.h.j2"),
                begin_marker: "/* cligen: begin generated code */",
                end_marker: "/* cligen: end generated code */",
            },
        ],
    }
}
