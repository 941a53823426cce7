use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::ids::{AuthorProfileId, BookId, ReaderId};
use crate::infrastructure::client::UserdeskClient;

#[derive(Debug, Args)]
pub struct IdArgs {
    #[arg(long)]
    pub id: i64,
}

/// `list` and `get` subcommands for a read-only listing.
macro_rules! define_listing_commands {
    ($commands:ident, $run:ident, $noun:literal, $id:ty, $list:ident, $get:ident) => {
        #[derive(Debug, Subcommand)]
        pub enum $commands {
            #[command(about = concat!("List all ", $noun, "s"))]
            List,
            #[command(about = concat!("Get a ", $noun, " by ID"))]
            Get(IdArgs),
        }

        pub async fn $run(client: &UserdeskClient, cmd: $commands) -> Result<()> {
            let library = client.library();
            match cmd {
                $commands::List => print_json(&library.$list().await?),
                $commands::Get(c) => print_json(&library.$get(<$id>::new(c.id)).await?),
            }
        }
    };
}

define_listing_commands!(
    ProfileCommands,
    run_profiles,
    "author profile",
    AuthorProfileId,
    list_profiles,
    get_profile
);
define_listing_commands!(BookCommands, run_books, "book", BookId, list_books, get_book);
define_listing_commands!(
    ReaderCommands,
    run_readers,
    "reader",
    ReaderId,
    list_readers,
    get_reader
);
