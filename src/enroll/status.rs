use std::fmt;

use serde::Serialize;

/// Outcome of one enrollment row, rendered in the `Estado` column.
///
/// Variants are listed in evaluation order, a row gets the first one that
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollStatus {
    MissingData,
    InvalidNationalId,
    InvalidCourse,
    EmailLinkedToOtherId,
    InvalidEmail,
    Enrolled,
    CreatedAndEnrolled,
}

impl EnrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollStatus::MissingData => "Faltan datos",
            EnrollStatus::InvalidNationalId => "Rut/Pasaporte invalido",
            EnrollStatus::InvalidCourse => "Id curso invalido o curso no existe",
            EnrollStatus::EmailLinkedToOtherId => "EL correo esta asociado a otro rut",
            EnrollStatus::InvalidEmail => "Formato del correo incorrecto",
            EnrollStatus::Enrolled => "Inscrito",
            EnrollStatus::CreatedAndEnrolled => "Creado e Inscrito",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EnrollStatus::Enrolled | EnrollStatus::CreatedAndEnrolled)
    }
}

impl fmt::Display for EnrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EnrollStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
