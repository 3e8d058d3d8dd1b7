/// Columns of a rerun row, in file order.
pub const RERUN_COLUMNS: usize = 5;

/// Header of the rerun result table and of the blank template.
pub static RERUN_HEADER: [&str; 6] = [
    "Course Id",
    "Nuevo Course Id",
    "Nombre curso nuevo",
    "Fecha de Inicio(UTC)",
    "Fecha de Termino(UTC)",
    "Estado",
];

/// One line of a rerun file:
/// `sourceCourseId; newCourseId; displayName; startTime; endTime`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerunRow {
    pub raw_fields: Vec<String>,
}

impl From<Vec<String>> for RerunRow {
    fn from(raw_fields: Vec<String>) -> Self {
        RerunRow { raw_fields }
    }
}

impl From<&[&str]> for RerunRow {
    fn from(fields: &[&str]) -> Self {
        RerunRow {
            raw_fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}

impl RerunRow {
    fn field(&self, index: usize) -> &str {
        self.raw_fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_complete(&self) -> bool {
        self.raw_fields.len() >= RERUN_COLUMNS
    }

    pub fn source_course_id(&self) -> &str {
        self.field(0)
    }

    pub fn new_course_id(&self) -> &str {
        self.field(1)
    }

    pub fn display_name(&self) -> &str {
        self.field(2)
    }

    pub fn start_time(&self) -> &str {
        self.field(3)
    }

    pub fn end_time(&self) -> &str {
        self.field(4)
    }

    pub fn padded(&self) -> Vec<String> {
        (0..RERUN_COLUMNS)
            .map(|index| self.field(index).to_string())
            .collect()
    }
}
