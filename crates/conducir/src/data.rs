//! Static example values consumed by page-object operations.
//!
//! A plain immutable record, supplied by value. It has no behavior and no
//! lifecycle beyond process startup.

/// Example values for every form and picker the suites drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestData {
    /// Inline form user name
    pub user_name: &'static str,
    /// Inline form email
    pub email: &'static str,
    /// Grid form email
    pub secondary_email: &'static str,
    /// Grid form password
    pub password: &'static str,

    // basic form //
    /// Basic form email
    pub basic_email: &'static str,
    /// Basic form password
    pub basic_password: &'static str,

    // form without labels //
    /// Recipients line
    pub recipients: &'static str,
    /// Subject line
    pub subject: &'static str,
    /// Message body
    pub message: &'static str,

    // block form //
    /// First name
    pub first_name: &'static str,
    /// Last name
    pub last_name: &'static str,
    /// Block form email
    pub block_email: &'static str,
    /// Website
    pub website: &'static str,

    // common date picker //
    /// Full date for the common picker
    pub common_date: &'static str,

    // date picker with range //
    /// Range start day of month
    pub range_start_day: &'static str,
    /// Range end day of month
    pub range_end_day: &'static str,

    // date picker with disabled min max values //
    /// Day of month inside the min/max window
    pub min_max_day: &'static str,
}

impl TestData {
    /// The example record the suites run with
    #[must_use]
    pub const fn get() -> Self {
        Self {
            user_name: "Jane Doe",
            email: "jane.doe@email.com",
            secondary_email: "emailkeduaseedoel@gmail.com",
            password: "Passwordnyanigh123",

            basic_email: "emailbasic@gmail.com",
            basic_password: "passbasic",

            recipients: "dia penerima",
            subject: "tolong terima",
            message: "ini adalah pesan, untuk memesan pesanan",

            first_name: "Depan",
            last_name: "Belakang",
            block_email: "depanbelakangnama@gmail.com",
            website: "websitenamalengkap.com",

            common_date: "Dec 31, 2025",

            range_start_day: "1",
            range_end_day: "31",

            min_max_day: "31",
        }
    }
}

impl Default for TestData {
    fn default() -> Self {
        Self::get()
    }
}
