/// Columns of an enrollment row, in file order.
pub const ENROLL_COLUMNS: usize = 8;

/// Header of the enrollment result table.
pub static ENROLL_HEADER: [&str; 10] = [
    "Email",
    "Apellido Paterno",
    "Apellido Materno",
    "Nombres",
    "RUT",
    "Fecha de Nacimiento",
    "Fono",
    "Id curso",
    "Username",
    "Estado",
];

/// Header of the blank enrollment template. Operators download it with the
/// course column spelled `Id Curso`.
pub static ENROLL_TEMPLATE_HEADER: [&str; ENROLL_COLUMNS] = [
    "Email",
    "Apellido Paterno",
    "Apellido Materno",
    "Nombres",
    "RUT",
    "Fecha de Nacimiento",
    "Fono",
    "Id Curso",
];

/// One line of an enrollment file:
/// `email; lastNameP; lastNameM; firstNames; nationalId; birthDate; phone; courseId`.
///
/// The raw fields are kept as read, a short row is only rejected once it
/// reaches the processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentRow {
    pub raw_fields: Vec<String>,
}

impl From<Vec<String>> for EnrollmentRow {
    fn from(raw_fields: Vec<String>) -> Self {
        EnrollmentRow { raw_fields }
    }
}

impl From<&[&str]> for EnrollmentRow {
    fn from(fields: &[&str]) -> Self {
        EnrollmentRow {
            raw_fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}

impl EnrollmentRow {
    fn field(&self, index: usize) -> &str {
        self.raw_fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_complete(&self) -> bool {
        self.raw_fields.len() >= ENROLL_COLUMNS
    }

    pub fn email(&self) -> &str {
        self.field(0)
    }

    pub fn last_name_p(&self) -> &str {
        self.field(1)
    }

    pub fn last_name_m(&self) -> &str {
        self.field(2)
    }

    pub fn first_names(&self) -> &str {
        self.field(3)
    }

    pub fn national_id(&self) -> &str {
        self.field(4)
    }

    pub fn birth_date(&self) -> &str {
        self.field(5)
    }

    pub fn phone(&self) -> &str {
        self.field(6)
    }

    pub fn course_id(&self) -> &str {
        self.field(7)
    }

    /// The named columns, absent ones as empty strings, extra ones dropped.
    ///
    /// A row wider than the result table is echoed whole except for its last
    /// column, which the status takes.
    pub fn padded(&self) -> Vec<String> {
        if self.raw_fields.len() > ENROLL_HEADER.len() {
            return self.raw_fields[..self.raw_fields.len() - 1].to_vec();
        }
        (0..ENROLL_COLUMNS)
            .map(|index| self.field(index).to_string())
            .collect()
    }
}
