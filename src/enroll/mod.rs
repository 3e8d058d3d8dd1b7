//! Bulk enrollment by national ID.
//!
//! Each row of an enrollment file names a person, their RUT or passport and a
//! course. The row processor validates the row, finds or creates the account
//! linked to the identifier, enrolls it and records a status:
//!
//! | Status                                | Meaning                                          |
//! |---------------------------------------|--------------------------------------------------|
//! | `Faltan datos`                        | fewer than 8 columns                             |
//! | `Rut/Pasaporte invalido`              | identifier fails validation                      |
//! | `Id curso invalido o curso no existe` | course key malformed or unknown                  |
//! | `EL correo esta asociado a otro rut`  | the email's account has another identifier       |
//! | `Formato del correo incorrecto`       | no account for the email and the email is malformed |
//! | `Inscrito`                            | an existing account was enrolled                 |
//! | `Creado e Inscrito`                   | an account was created, then enrolled            |

pub mod batch;
pub mod processor;
pub mod row;
pub mod single;
pub mod status;

pub use batch::{EnrollmentBatch, EnrollmentBatchBuilder, EnrollmentReport};
pub use processor::{EnrollmentOutcome, EnrollmentProcessor};
pub use row::EnrollmentRow;
pub use single::{EnrollRequest, SingleEnrollment, UnenrollRequest};
pub use status::EnrollStatus;

/// Reader over an uploaded enrollment file. The header line is discarded.
#[cfg(feature = "csv")]
pub fn read_enrollment_csv<R: std::io::Read>(
    source: R,
) -> crate::item::csv::csv_reader::CsvItemReader<R> {
    crate::item::csv::csv_reader::CsvItemReaderBuilder::new().from_reader(source)
}
