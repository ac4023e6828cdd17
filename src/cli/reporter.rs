use tsb_common::Diagnostic;

/// Render a diagnostic as `file(line,character): message`, one-based.
///
/// Without a file the message stands alone; a file without a position is
/// reported at `(1,1)`.
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    match diagnostic.file.as_deref() {
        Some(file) => format!(
            "{}({},{}): {}",
            file,
            diagnostic.line.unwrap_or(0) + 1,
            diagnostic.character.unwrap_or(0) + 1,
            diagnostic.message_text
        ),
        None => diagnostic.message_text.clone(),
    }
}

/// Written outputs grouped by kind.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutputSummary<'a> {
    pub js: Vec<&'a str>,
    pub maps: Vec<&'a str>,
    pub declarations: Vec<&'a str>,
    pub other: Vec<&'a str>,
}

impl<'a> OutputSummary<'a> {
    pub fn from_paths(paths: &'a [String]) -> Self {
        let mut summary = Self::default();
        for path in paths {
            let path = path.as_str();
            if path.ends_with(".js") {
                summary.js.push(path);
            } else if path.ends_with(".js.map") {
                summary.maps.push(path);
            } else if path.ends_with(".d.ts") {
                summary.declarations.push(path);
            } else {
                summary.other.push(path);
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.js.len() + self.maps.len() + self.declarations.len() + self.other.len()
    }

    /// `js: 2 files, map: 2 files, declaration: 0 files`
    pub fn counts_line(&self) -> String {
        format!(
            "js: {}, map: {}, declaration: {}",
            pluralize_file(self.js.len()),
            pluralize_file(self.maps.len()),
            pluralize_file(self.declarations.len())
        )
    }

    /// Lines reported after a successful run.
    pub fn lines(&self, single_output: bool) -> Vec<String> {
        if single_output {
            let mut lines = Vec::new();
            if let Some(first) = self.js.first() {
                lines.push(format!("File {first} created."));
            }
            lines.push(self.counts_line());
            lines
        } else {
            vec![format!(
                "{} created. {}",
                pluralize_file(self.total()),
                self.counts_line()
            )]
        }
    }
}

fn pluralize_file(count: usize) -> String {
    if count == 1 {
        format!("{count} file")
    } else {
        format!("{count} files")
    }
}
