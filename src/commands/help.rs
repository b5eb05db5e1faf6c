//! Command registry behind `/start` and `/help`.
//! Moderator entries are only shown to callers on the allow-list.

use std::fmt::Write as _;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CommandCategory {
    Listings,
    Feedback,
    Moderation,
}

impl CommandCategory {
    fn name(&self) -> &'static str {
        match self {
            Self::Listings => "Listings",
            Self::Feedback => "Reviews & feedback",
            Self::Moderation => "Moderation",
        }
    }
}

pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "submit_ad",
        usage: "/submit_ad",
        description: "create a listing",
        category: CommandCategory::Listings,
    },
    CommandInfo {
        name: "edit_ad",
        usage: "/edit_ad [ID]",
        description: "edit your listings",
        category: CommandCategory::Listings,
    },
    CommandInfo {
        name: "delete_ad",
        usage: "/delete_ad [ID]",
        description: "delete one of your listings",
        category: CommandCategory::Listings,
    },
    CommandInfo {
        name: "search_ads",
        usage: "/search_ads",
        description: "search listings",
        category: CommandCategory::Listings,
    },
    CommandInfo {
        name: "reviews",
        usage: "/reviews",
        description: "read reviews",
        category: CommandCategory::Feedback,
    },
    CommandInfo {
        name: "report",
        usage: "/report",
        description: "send feedback or a complaint",
        category: CommandCategory::Feedback,
    },
    CommandInfo {
        name: "moderated",
        usage: "/moderated",
        description: "listings waiting for moderation",
        category: CommandCategory::Moderation,
    },
    CommandInfo {
        name: "add",
        usage: "/add [ID]",
        description: "approve a listing",
        category: CommandCategory::Moderation,
    },
    CommandInfo {
        name: "deny",
        usage: "/deny [ID]",
        description: "reject a listing",
        category: CommandCategory::Moderation,
    },
    CommandInfo {
        name: "reviews_content",
        usage: "/reviews_content",
        description: "content complaints",
        category: CommandCategory::Moderation,
    },
];

pub const GREETING: &str =
    "Hi, this is the clothing rental bot. Send /help and I will list the commands I understand.";

/// Primary command names listed by `/help`.
pub fn all_command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|c| c.name).collect()
}

pub fn help_text(is_moderator: bool) -> String {
    let mut out = String::from("I understand the following commands:\n");
    for category in [
        CommandCategory::Listings,
        CommandCategory::Feedback,
        CommandCategory::Moderation,
    ] {
        if category == CommandCategory::Moderation && !is_moderator {
            continue;
        }
        let _ = write!(out, "\n{}:\n", category.name());
        for cmd in COMMANDS.iter().filter(|c| c.category == category) {
            let _ = writeln!(out, "{} - {}", cmd.usage, cmd.description);
        }
    }
    out
}
