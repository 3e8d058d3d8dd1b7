use std::fmt;

use serde::Serialize;

/// Outcome of one rerun row, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RerunStatus {
    MissingData,
    InvalidNewCourse,
    InvalidSourceCourse,
    NewCourseExists,
    PermissionDenied,
    InvalidDates,
    Processing,
    RerunFailed,
}

impl RerunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RerunStatus::MissingData => "Faltan datos",
            RerunStatus::InvalidNewCourse => "Formato del nuevo course_id incorrecto",
            RerunStatus::InvalidSourceCourse => {
                "Formato del course_id incorrecto o el curso no existe"
            }
            RerunStatus::NewCourseExists => "El nuevo course id ya existe",
            RerunStatus::PermissionDenied => "Usuario no tiene permisos en el curso",
            RerunStatus::InvalidDates => "Formato incorrecto en las fechas del curso",
            RerunStatus::Processing => "Procesandose",
            RerunStatus::RerunFailed => "Error en relanzar el curso",
        }
    }
}

impl fmt::Display for RerunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RerunStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
