//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};

/// Administration client for local authorities, users, and payouts.
#[derive(Parser)]
#[command(name = "la-admin", version)]
#[command(about = "Administration CLI for the local authority backend", long_about = None)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Backend API base URL (overrides profile and env)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Store a session token (valid for one hour)
    Login {
        /// Session token (falls back to LA_ADMIN_TOKEN, the profile, then a prompt)
        #[arg(long)]
        token: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Show whether a session is active and when it expires
    Status,

    /// Show daily income
    Dashboard,

    /// Local authority management
    #[command(subcommand)]
    Authority(AuthorityCommands),

    /// User management
    #[command(subcommand)]
    User(UserCommands),

    /// PayPal payouts of collected income
    #[command(subcommand)]
    Payment(PaymentCommands),

    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Fields of the local authority form.
#[derive(Args, Clone, Debug, Default)]
pub struct AuthorityFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Short name
    #[arg(long)]
    pub nickname: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Area covered
    #[arg(long)]
    pub area: Option<String>,

    /// State
    #[arg(long)]
    pub state: Option<String>,
}

/// Local authority subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum AuthorityCommands {
    /// List all local authorities
    List,

    /// Show local authority details
    Show {
        /// Local authority ID
        id: String,
    },

    /// Add a new local authority
    Create {
        #[command(flatten)]
        fields: AuthorityFields,
    },

    /// Edit a local authority (unset fields keep their current value)
    Update {
        /// Local authority ID
        id: String,

        #[command(flatten)]
        fields: AuthorityFields,
    },

    /// Remove a local authority
    Delete {
        /// Local authority ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

/// User subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum UserCommands {
    /// List all users
    List,

    /// Show user details
    Show {
        /// User ID
        uid: String,
    },

    /// Edit a user (unset fields keep their current value)
    Update {
        /// User ID
        uid: String,

        #[command(flatten)]
        fields: UserFields,
    },
}

/// Editable user fields. Unset fields keep the current value.
#[derive(Args, Clone, Debug, Default)]
pub struct UserFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address (checked only, the backend keeps its own)
    #[arg(long)]
    pub email: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Role: admin, user, or "traffic warden"
    #[arg(long)]
    pub role: Option<String>,
}

/// Payment subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum PaymentCommands {
    /// Create a PayPal payment and print the approval link
    Start {
        /// Local authority ID
        authority_id: String,

        /// Paying user's ID
        #[arg(long)]
        uid: String,

        /// Amount in MYR (defaults to the authority's collected income)
        #[arg(long)]
        amount: Option<f64>,

        /// Open the approval link in a browser
        #[arg(long)]
        open: bool,
    },

    /// Clear the authority's income after PayPal approved the payment
    Confirm {
        /// Local authority ID
        authority_id: String,
    },

    /// Apply the result carried by PayPal's return URL
    Return {
        /// Local authority ID
        authority_id: String,

        /// URL PayPal redirected to (with `success` or `cancel`)
        return_url: String,
    },

    /// Record that the payment was abandoned (income is kept)
    Cancel {
        /// Local authority ID
        authority_id: String,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum ConfigCommands {
    /// Create a new config file with default settings
    Init {
        /// Backend URL for the default profile
        #[arg(long)]
        server: Option<String>,

        /// Session token for the default profile
        #[arg(long)]
        token: Option<String>,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Set profile values (creates profile if it doesn't exist)
    Set {
        /// Profile name to update (defaults to "default")
        #[arg(long = "name", default_value = "default")]
        profile: String,

        /// Backend URL
        #[arg(long)]
        server: Option<String>,

        /// Session token
        #[arg(long)]
        token: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Set this profile as the default
        #[arg(long)]
        default: bool,
    },

    /// Show current configuration
    Show {
        /// Show actual token values (by default tokens are masked)
        #[arg(long)]
        show_token: bool,
    },

    /// List all available profiles
    Profiles,

    /// Show config file path
    Path,
}
