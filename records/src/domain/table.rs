use std::fmt;

/// The tables of the remote record store used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Project,
    Client,
    TimeEntry,
    Attachment,
    Tag,
    TeamMember,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Project,
        Table::Client,
        Table::TimeEntry,
        Table::Attachment,
        Table::Tag,
        Table::TeamMember,
    ];

    /// Name of the table as the remote API knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Project => "project2",
            Table::Client => "client",
            Table::TimeEntry => "time_entry",
            Table::Attachment => "Attachment1",
            Table::Tag => "tag",
            Table::TeamMember => "team_member",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
