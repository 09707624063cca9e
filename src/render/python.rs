//! Python target language support.

use super::{OutputFileInfo, TargetLanguage};

pub fn target() -> TargetLanguage {
    TargetLanguage {
        key: "python",
        name: "Python",
        output_files: vec![OutputFileInfo {
            name: "source file",
            default_path: "cligen.py",
            template_name: "python.py.j2",
            template_source: include_str!("../../templates/python.py.j2"),
            begin_marker: "# cligen: begin generated code",
            end_marker: "# cligen: end generated code",
        }],
    }
}
