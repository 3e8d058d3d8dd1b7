mod common;

use std::io::{self, ErrorKind};

use common::{InMemoryPlatform, MockFile, init_logger};

use bulk_enroll_rs::{
    BatchError,
    config::{BatchConfig, EnrollMode},
    enroll::{
        EnrollRequest, EnrollStatus, EnrollmentBatch, EnrollmentBatchBuilder, EnrollmentReport,
        EnrollmentRow, UnenrollRequest, read_enrollment_csv,
    },
    notification::NotificationTemplate,
};

fn batch(platform: &InMemoryPlatform) -> EnrollmentBatch<'_> {
    EnrollmentBatchBuilder::new()
        .users(platform)
        .identities(platform)
        .catalog(platform)
        .transactions(platform)
        .mode(EnrollMode::Honor)
        .build()
        .unwrap()
}

fn row(fields: &[&str]) -> EnrollmentRow {
    EnrollmentRow::from(fields)
}

#[test]
fn uploaded_file_should_get_one_status_per_row() -> anyhow::Result<()> {
    init_logger();
    let platform = InMemoryPlatform::default();
    let course = platform.add_course("course-v1:mss+MSS001+2019_2", "Demo course");
    let course2 = platform.add_course("course-v1:mss+MSS002+2019_2", "Second course");
    let student = platform.add_account("student", "student@edx.org", "Robert Smith");
    platform.link_identity("11111111-1", &student);

    let (c1, c2) = (course.to_string(), course2.to_string());
    let rows: Vec<Vec<&str>> = vec![
        vec!["student@edx.org", "a", "b", "c", "11111111-1", "10/10/2020", "12345689", c1.as_str()],
        vec!["student@edx.org", "a", "b", "c", "PASDDAS", "10/10/2020", "12345689", c1.as_str()],
        vec!["aux.student2@edx.org", "LastNameP", "LastNameM", "User", "P123456", "10/10/2020", "12345689", c1.as_str()],
        vec!["@edx.org", "LastNameP", "LastNameM", "User", "P789456", "10/10/2020", "12345689", c1.as_str()],
        vec!["qwe@edx.org", "LastNameP", "LastNameM", "User", "456789123", "10/10/2020", "12345689", c1.as_str()],
        vec!["qwe@edx.org", "LastNameP", "LastNameM", "User", "P123123123123123123123132123453689", "10/10/2020", "12345689", c1.as_str()],
        vec!["asd@edx.org", "User", "LastName1", "LastName2", "LASTNAME3", "LastName4", "LastName4", "LastName4", "LastName4", "LastName4", "LastName4", "LastName4", c1.as_str()],
        vec!["asd@edx.org"],
        vec!["aux.student4@edx.org", "LastNameP", "LastNameM", "User", "P789456", "10/10/2020", "12345689", c2.as_str(), "asd", "asdasd"],
        vec!["student@edx.org", "a", "b", "c", "11111111-1", "10/10/2020", "P234dsf3", ""],
        vec!["student@edx.org", "a", "b", "c", "11111111-1", "10/10/2020", "Pasd3241", "course-v1:eol+Tes+t202+2021"],
    ];

    let report = batch(&platform).process(rows.iter().map(|fields| row(fields)).collect())?;

    assert_eq!(
        report.statuses(),
        vec![
            "Inscrito",
            "EL correo esta asociado a otro rut",
            "Creado e Inscrito",
            "Formato del correo incorrecto",
            "Rut/Pasaporte invalido",
            "Rut/Pasaporte invalido",
            "Rut/Pasaporte invalido",
            "Faltan datos",
            "Creado e Inscrito",
            "Id curso invalido o curso no existe",
            "Id curso invalido o curso no existe",
        ]
    );

    let usernames: Vec<&str> = report.output_table.iter().map(|row| row[8].as_str()).collect();
    assert_eq!(
        usernames,
        vec!["student", "", "user_lastnamep", "", "", "", "LastName4", "", "user_lastnamep_l", "", ""]
    );

    // 8 input columns, the username and the status, except for a row wider
    // than that, echoed with its last column replaced by the status
    let mut wide = rows[6][..12].to_vec();
    wide.push("Rut/Pasaporte invalido");
    assert_eq!(report.output_table[6], wide);
    assert!(report
        .output_table
        .iter()
        .enumerate()
        .all(|(index, row)| index == 6 || row.len() == 10));
    assert_eq!(report.output_table[7][0], "asd@edx.org");
    assert_eq!(report.output_table[8][7], c2);

    assert!(platform.account_by_email("aux.student2@edx.org").is_some());
    assert!(platform.identity("P123456").is_some());
    assert!(platform.identity("PASDDAS").is_none());
    assert!(platform.is_enrolled("student", &course));
    assert!(platform.is_enrolled("user_lastnamep", &course));
    assert!(platform.is_enrolled("user_lastnamep_l", &course2));
    assert_eq!(*platform.journal.borrow(), vec!["begin", "commit"]);

    assert_eq!(report.notifications.len(), 3);
    assert_eq!(report.notifications[0].password, "");
    assert_eq!(report.notifications[0].user_name, "Robert Smith");
    assert_eq!(report.notifications[0].template(), NotificationTemplate::ExistingAccount);
    assert_eq!(report.notifications[1].email, "aux.student2@edx.org");
    assert_eq!(report.notifications[1].user_name, "User LastNameP LastNameM");
    assert_eq!(report.notifications[1].course_name, "Demo course");
    assert_eq!(report.notifications[2].course_name, "Second course");
    for notification in &report.notifications[1..] {
        assert_eq!(notification.password.len(), 12);
        assert!(notification
            .password
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(notification.template(), NotificationTemplate::NewAccount);
    }

    Ok(())
}

#[test]
fn fresh_identity_should_create_and_enroll() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    let course = platform.add_course("course-v1:eol+Demo+2024", "Demo");

    let report = batch(&platform).process(vec![row(&[
        "a@b.com",
        "P",
        "M",
        "First",
        "11111111-1",
        "01/01/2000",
        "555",
        "course-v1:eol+Demo+2024",
    ])])?;

    assert_eq!(report.statuses(), vec!["Creado e Inscrito"]);
    assert_eq!(report.output_table[0][8], "first_p");
    assert!(!report.notifications[0].password.is_empty());
    assert!(platform.is_enrolled("first_p", &course));

    let record = platform.identity("11111111-1").unwrap();
    assert_eq!(record.account.email, "a@b.com");
    assert_eq!(record.fields.first_names, "First");
    assert_eq!(record.fields.birth_date, "01/01/2000");
    Ok(())
}

#[test]
fn repeated_identity_should_reuse_the_created_account() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");
    let fields = [
        "ana@edx.org",
        "Soto",
        "Rojas",
        "Ana",
        "12.345.678-5",
        "01/01/2000",
        "555",
        "course-v1:eol+Demo+2024",
    ];

    let report = batch(&platform).process(vec![row(&fields), row(&fields)])?;

    assert_eq!(report.statuses(), vec!["Creado e Inscrito", "Inscrito"]);
    assert_eq!(report.output_table[0][8], report.output_table[1][8]);
    assert_eq!(report.notifications[1].password, "");
    assert_eq!(platform.account_count(), 1);
    assert_eq!(platform.identity_count(), 1);
    // identifiers are stored in canonical form
    assert!(platform.identity("12345678-5").is_some());
    Ok(())
}

#[test]
fn short_row_should_not_reach_the_platform() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();

    let report = batch(&platform).process(vec![row(&["asd@edx.org", "a", "b"])])?;

    assert_eq!(report.statuses(), vec![EnrollStatus::MissingData.as_str()]);
    assert_eq!(
        report.output_table[0],
        vec!["asd@edx.org", "a", "b", "", "", "", "", "", "", "Faltan datos"]
    );
    assert_eq!(platform.calls.get(), 0);
    assert!(report.notifications.is_empty());
    Ok(())
}

#[test]
fn account_without_identity_should_be_linked() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    let course = platform.add_course("course-v1:eol+Demo+2024", "Demo");
    platform.add_account("jperez", "jperez@edx.org", "Juan Perez");

    let report = batch(&platform).process(vec![row(&[
        " JPerez@EDX.org ",
        "Perez",
        "",
        "Juan",
        "p012345",
        "",
        "",
        "course-v1:eol+Demo+2024",
    ])])?;

    assert_eq!(report.statuses(), vec!["Inscrito"]);
    assert_eq!(report.output_table[0][8], "jperez");
    assert_eq!(report.notifications[0].password, "");
    assert_eq!(platform.account_count(), 1);
    assert_eq!(platform.identity("P012345").unwrap().account.username, "jperez");
    assert!(platform.is_enrolled("jperez", &course));
    Ok(())
}

#[test]
fn course_names_should_be_fetched_once_per_batch() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");
    let rows = ["11111111-1", "12345678-5", "P123456"]
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let email = format!("user{}@edx.org", index);
            EnrollmentRow::from(vec![
                email,
                "Soto".to_string(),
                "Rojas".to_string(),
                "Ana".to_string(),
                id.to_string(),
                String::new(),
                String::new(),
                "course-v1:eol+Demo+2024".to_string(),
            ])
        })
        .collect();

    let report = batch(&platform).process(rows)?;

    assert_eq!(
        report.statuses(),
        vec!["Creado e Inscrito", "Creado e Inscrito", "Creado e Inscrito"]
    );
    assert_eq!(report.output_table[1][8], "ana_soto_r");
    assert_eq!(platform.display_name_lookups.get(), 1);
    Ok(())
}

#[test]
fn missing_identity_storage_should_stop_before_any_row() {
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");

    let batch = EnrollmentBatchBuilder::new()
        .users(&platform)
        .catalog(&platform)
        .transactions(&platform)
        .build()
        .unwrap();

    let result = batch.process(vec![row(&[
        "a@b.com",
        "P",
        "M",
        "First",
        "11111111-1",
        "",
        "",
        "course-v1:eol+Demo+2024",
    ])]);

    assert!(matches!(result, Err(BatchError::FeatureUnavailable(_))));
    assert_eq!(platform.calls.get(), 0);
    assert!(platform.journal.borrow().is_empty());
}

#[test]
fn platform_failure_should_roll_back_the_whole_batch() {
    init_logger();
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");
    let broken = platform.add_course("course-v1:eol+Broken+2024", "Broken");
    platform.fail_enrollments_in(&broken);

    let result = batch(&platform).process(vec![
        row(&["a@b.com", "P", "M", "First", "11111111-1", "", "", "course-v1:eol+Demo+2024"]),
        row(&["c@d.com", "Q", "N", "Second", "12345678-5", "", "", "course-v1:eol+Broken+2024"]),
    ]);

    let Err(BatchError::Platform(message)) = result else {
        panic!("batch should have failed with the platform error");
    };
    assert_eq!(message, "enrollment in course-v1:eol+Broken+2024 refused");

    assert_eq!(*platform.journal.borrow(), vec!["begin", "rollback"]);
    assert_eq!(platform.account_count(), 0);
    assert_eq!(platform.identity_count(), 0);
    assert_eq!(platform.enrollment_count(), 0);
}

#[test]
fn exhausted_usernames_should_abort_the_batch() {
    init_logger();
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");
    for taken in ["first_p", "first_p_m", "first_p1"] {
        platform.add_account(taken, &format!("{}@edx.org", taken), "Taken");
    }

    let batch = EnrollmentBatchBuilder::new()
        .users(&platform)
        .identities(&platform)
        .catalog(&platform)
        .transactions(&platform)
        .config(BatchConfig {
            username_max_suffix: 1,
            ..BatchConfig::default()
        })
        .build()
        .unwrap();

    let result = batch.process(vec![row(&[
        "new@edx.org",
        "P",
        "M",
        "First",
        "11111111-1",
        "",
        "",
        "course-v1:eol+Demo+2024",
    ])]);

    let Err(BatchError::UsernameExhausted(names)) = result else {
        panic!("batch should have run out of usernames");
    };
    assert_eq!(names, "first p m");
    assert_eq!(*platform.journal.borrow(), vec!["begin", "rollback"]);
    assert_eq!(platform.account_count(), 3);
    assert_eq!(platform.identity_count(), 0);
}

#[test]
fn configured_mode_should_be_used_for_enrollments() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    let course = platform.add_course("course-v1:eol+Demo+2024", "Demo");

    let batch = EnrollmentBatchBuilder::new()
        .users(&platform)
        .identities(&platform)
        .catalog(&platform)
        .mode(EnrollMode::Audit)
        .config(BatchConfig {
            chunk_size: 1,
            ..BatchConfig::default()
        })
        .build()?;
    batch.process(vec![row(&[
        "a@b.com",
        "P",
        "M",
        "First",
        "11111111-1",
        "",
        "",
        "course-v1:eol+Demo+2024",
    ])])?;

    assert_eq!(platform.mode_of("first_p", &course), Some(EnrollMode::Audit));
    Ok(())
}

#[test]
fn csv_upload_should_produce_the_result_table() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");
    let upload = "Email;Apellido Paterno;Apellido Materno;Nombres;RUT;Fecha de Nacimiento;Fono;Id curso\r\n\
                  ana@edx.org;Soto;Rojas;Ana;11111111-1;01/01/2000;555;course-v1:eol+Demo+2024\r\n\
                  asd@edx.org\r\n\
                  qwe@edx.org;Soto;Rojas;Ana;456789123;01/01/2000;555;course-v1:eol+Demo+2024\r\n";

    let report = batch(&platform).run(&read_enrollment_csv(upload.as_bytes()))?;
    let output = String::from_utf8(report.write_csv(Vec::new())?)?;

    assert_eq!(
        output,
        "Email;Apellido Paterno;Apellido Materno;Nombres;RUT;Fecha de Nacimiento;Fono;Id curso;Username;Estado\r\n\
         ana@edx.org;Soto;Rojas;Ana;11111111-1;01/01/2000;555;course-v1:eol+Demo+2024;ana_soto;Creado e Inscrito\r\n\
         asd@edx.org;;;;;;;;;Faltan datos\r\n\
         qwe@edx.org;Soto;Rojas;Ana;456789123;01/01/2000;555;course-v1:eol+Demo+2024;;Rut/Pasaporte invalido\r\n"
    );
    assert_eq!(EnrollmentReport::header().len(), 10);
    Ok(())
}

#[test]
fn blank_lines_should_keep_their_place_in_the_result_table() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");
    let upload = "Email;Apellido Paterno;Apellido Materno;Nombres;RUT;Fecha de Nacimiento;Fono;Id curso\r\n\
                  ana@edx.org;Soto;Rojas;Ana;11111111-1;01/01/2000;555;course-v1:eol+Demo+2024\r\n\
                  \r\n\
                  c@d.com\r\n";

    let report = batch(&platform).run(&read_enrollment_csv(upload.as_bytes()))?;

    assert_eq!(
        report.statuses(),
        vec!["Creado e Inscrito", "Faltan datos", "Faltan datos"]
    );
    assert_eq!(report.output_table[1][0], "");
    assert_eq!(report.output_table[2][0], "c@d.com");
    Ok(())
}

#[test]
fn failing_output_should_surface_a_writer_error() {
    let report = EnrollmentReport {
        output_table: vec![vec!["asd@edx.org".to_string(), "Faltan datos".to_string()]],
        notifications: vec![],
    };

    let mut file = MockFile::default();
    file.expect_write()
        .returning(|_buf| Err(io::Error::from(ErrorKind::PermissionDenied)));
    file.expect_flush().returning(|| Ok(()));

    let result = report.write_csv(file);

    assert!(matches!(result, Err(BatchError::ItemWriter(_))));
}

fn enroll_request(rut: &str, mode: &str) -> EnrollRequest {
    EnrollRequest {
        email: "student2@edx.org".to_string(),
        lastname_1: "Perez".to_string(),
        lastname_2: String::new(),
        names: "Juan".to_string(),
        rut: rut.to_string(),
        birthday: "01/01/2000".to_string(),
        phone: "555".to_string(),
        course: "course-v1:eol+Demo+2024".to_string(),
        mode: mode.to_string(),
    }
}

#[test]
fn single_request_should_follow_the_row_rules() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    let course = platform.add_course("course-v1:eol+Demo+2024", "Demo");

    let enrollment = batch(&platform).enroll_one(&enroll_request("11111111-1", "audit"))?;

    assert_eq!(enrollment.status, EnrollStatus::CreatedAndEnrolled);
    assert_eq!(enrollment.username, "juan_perez");
    let notification = enrollment.notification.unwrap();
    assert_eq!(notification.subject(), "Inscripción en el curso: Demo");
    assert_eq!(platform.mode_of("juan_perez", &course), Some(EnrollMode::Audit));
    assert_eq!(*platform.journal.borrow(), vec!["begin", "commit"]);
    Ok(())
}

#[test]
fn invalid_single_request_should_list_every_problem() {
    let platform = InMemoryPlatform::default();
    let mut request = enroll_request("11111111-2", "asdad");
    request.email = "student2@edx@g".to_string();
    request.course = "course-v1:eol+Missing+2024".to_string();
    request.names = " ".to_string();

    let Err(BatchError::Validation(errors)) = batch(&platform).enroll_one(&request) else {
        panic!("request should be rejected");
    };

    assert_eq!(
        errors,
        vec![
            "names: This field may not be blank.",
            "email: 'Email invalid': student2@edx@g",
            "rut: 'Rut/Passport invalid': 11111111-2",
            "course: Course key not valid or dont exists: course-v1:eol+Missing+2024",
            "mode: \"asdad\" is not a valid choice.",
        ]
    );
    assert_eq!(platform.account_count(), 0);
    assert!(platform.journal.borrow().is_empty());
}

#[test]
fn unenroll_should_remove_the_linked_enrollment() -> anyhow::Result<()> {
    let platform = InMemoryPlatform::default();
    let course = platform.add_course("course-v1:eol+Demo+2024", "Demo");
    let student = platform.add_account("student", "student@edx.org", "Robert Smith");
    platform.link_identity("11111111-1", &student);
    platform.enroll_directly(&student, &course);

    batch(&platform).unenroll(&UnenrollRequest {
        rut: "11.111.111-1".to_string(),
        course: course.to_string(),
    })?;

    assert!(!platform.is_enrolled("student", &course));
    Ok(())
}

#[test]
fn unenroll_should_require_a_registered_identity() {
    let platform = InMemoryPlatform::default();
    platform.add_course("course-v1:eol+Demo+2024", "Demo");

    let result = batch(&platform).unenroll(&UnenrollRequest {
        rut: "12345678-5".to_string(),
        course: "asdsadsad".to_string(),
    });

    let Err(BatchError::Validation(errors)) = result else {
        panic!("unregistered identity accepted");
    };
    assert_eq!(
        errors,
        vec![
            "rut: 'Rut/Passport is not registered': 12345678-5",
            "course: Course key not valid or dont exists: asdsadsad",
        ]
    );
}

#[test]
fn builder_should_require_users_and_catalog() {
    let platform = InMemoryPlatform::default();

    let result = EnrollmentBatchBuilder::new().users(&platform).build();

    assert!(matches!(result, Err(BatchError::Configuration(_))));
}
