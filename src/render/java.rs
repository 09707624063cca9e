//! Java target language support.

use super::{OutputFileInfo, TargetLanguage};

pub fn target() -> TargetLanguage {
    TargetLanguage {
        key: "java",
        name: "Java",
        output_files: vec![OutputFileInfo {
            name: "source file",
            default_path: "CligenArgs.java",
            template_name: "java.java.j2",
            template_source: include_str!("../../templates/java.java.j2"),
            begin_marker: "// cligen: begin generated code",
            end_marker: "// cligen: end generated code",
        }],
    }
}
