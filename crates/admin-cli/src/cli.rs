use clap::{Args, Parser, Subcommand};
use models::models::{alcohol::AlcoholCategory, banner::BannerType, help::HelpStatus};

#[derive(Parser)]
#[command(name = "whisky-admin", about = "Manage the whisky catalog from the terminal", version)]
pub struct Cli {
    /// API base URL, overrides the config file and WHISKY_ADMIN_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session tokens
    Login {
        email: String,

        /// Prompted for when omitted
        #[arg(long, env = "WHISKY_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Promotional banners
    #[command(subcommand)]
    Banners(BannerCommands),

    /// Curated whisky collections
    #[command(subcommand)]
    Curations(CurationCommands),

    /// Tasting tags
    #[command(subcommand)]
    Tags(TagCommands),

    /// Whisky records
    #[command(subcommand)]
    Alcohols(AlcoholCommands),

    /// List regions
    Regions {
        #[arg(long)]
        keyword: Option<String>,
    },

    /// List distilleries
    Distilleries {
        #[arg(long)]
        keyword: Option<String>,

        #[arg(long)]
        region_id: Option<i64>,
    },

    /// User inquiries
    #[command(subcommand)]
    Helps(HelpCommands),
}

#[derive(Args, Clone, Default)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct MoveArgs {
    /// 1-based row number in the current list
    pub from: usize,

    /// 1-based row number to move to
    pub to: usize,
}

#[derive(Subcommand)]
pub enum BannerCommands {
    List {
        #[arg(long)]
        keyword: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: i64,
    },
    /// Create (`new`) or update (`<id>`) a banner
    Save {
        target: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        banner_type: Option<BannerType>,

        #[arg(long)]
        image_url: Option<String>,

        #[arg(long)]
        target_url: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },
    Delete(DeleteArgs),
    /// Drag a banner to a new position
    Move(MoveArgs),
    /// Turn a banner on or off
    Status {
        id: i64,

        #[arg(long)]
        active: bool,
    },
}

#[derive(Subcommand)]
pub enum CurationCommands {
    List {
        #[arg(long)]
        keyword: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: i64,
    },
    /// Create (`new`) or update (`<id>`) a curation
    Save {
        target: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        cover_image_url: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },
    Delete(DeleteArgs),
    Move(MoveArgs),
    AddAlcohols {
        id: i64,

        #[arg(required = true)]
        alcohol_ids: Vec<i64>,
    },
    RemoveAlcohol {
        id: i64,
        alcohol_id: i64,
    },
}

#[derive(Subcommand)]
pub enum TagCommands {
    List {
        #[arg(long)]
        keyword: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: i64,
    },
    /// Create (`new`) or update (`<id>`) a tasting tag
    Save {
        target: String,

        #[arg(long)]
        kor_name: Option<String>,

        #[arg(long)]
        eng_name: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    Delete(DeleteArgs),
    Connect {
        id: i64,

        #[arg(required = true)]
        alcohol_ids: Vec<i64>,
    },
    Disconnect {
        id: i64,

        #[arg(required = true)]
        alcohol_ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum AlcoholCommands {
    Search {
        keyword: Option<String>,

        #[arg(long)]
        category: Option<AlcoholCategory>,

        #[arg(long)]
        region_id: Option<i64>,

        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: i64,
    },
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum HelpCommands {
    List {
        #[arg(long)]
        status: Option<HelpStatus>,

        #[arg(long)]
        page_size: Option<u32>,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    Show {
        id: i64,
    },
    Answer {
        id: i64,

        content: String,

        #[arg(long, default_value = "SUCCESS")]
        status: HelpStatus,
    },
}
