use crate::pdf::PdfDocument;
use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct InfoOutcome {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

pub fn run<P: AsRef<Path>>(path: P) -> Result<InfoOutcome> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();

    Ok(InfoOutcome {
        path: path.as_ref().display().to_string(),
        page_count: info.page_count,
        title: info.title,
        author: info.author,
        subject: info.subject,
        keywords: info.keywords,
        creator: info.creator,
        producer: info.producer,
        creation_date: info.creation_date,
        mod_date: info.mod_date,
    })
}

impl fmt::Display for InfoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.path)?;
        write!(f, "Pages: {}", self.page_count)?;

        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                write!(f, "\n{}: {}", label, value)?;
            }
        }
        if let Some(date) = &self.creation_date {
            write!(f, "\nCreated: {}", format_pdf_date(date))?;
        }
        if let Some(date) = &self.mod_date {
            write!(f, "\nModified: {}", format_pdf_date(date))?;
        }
        Ok(())
    }
}

fn format_pdf_date(date: &str) -> String {
    // D:YYYYMMDDHHmmSSOHH'mm
    let Some(d) = date.strip_prefix("D:") else {
        return date.to_string();
    };
    let digits = move |range: std::ops::Range<usize>| {
        d.get(range).filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
    };

    let Some(day) = digits(0..8) else {
        return date.to_string();
    };
    let time = match digits(8..14) {
        Some(t) => format!(" {}:{}:{}", &t[0..2], &t[2..4], &t[4..6]),
        None => String::new(),
    };
    format!("{}-{}-{}{}", &day[0..4], &day[4..6], &day[6..8], time)
}
