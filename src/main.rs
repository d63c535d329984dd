use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;

use wayfarer::chat::{self, ChatContext};
use wayfarer::cli::Args;
use wayfarer::config::Config;
use wayfarer::history::ChatHistoryStore;
use wayfarer::memory::{ChatMemory, InMemoryChatMemory};
use wayfarer::tools::{AmapClient, ToolRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let memory: Arc<dyn ChatMemory> = Arc::new(InMemoryChatMemory::new());
    let store = match ChatHistoryStore::open(memory.clone(), &config.storage) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    // Administrative operations work on the store alone
    if args.list_chats {
        let chat_ids = store.chat_ids(&args.category);
        if chat_ids.is_empty() {
            println!("No conversations under category '{}'.", args.category);
        } else {
            for chat_id in chat_ids {
                println!("{}", chat_id);
            }
        }
        return Ok(());
    }

    if let Some(chat_id) = &args.delete_chat {
        store.delete(&args.category, chat_id);
        persist_or_exit(&store, &config);
        println!(
            "{}",
            format!(
                "Deleted conversation '{}' from category '{}'.",
                chat_id, args.category
            )
            .green()
        );
        return Ok(());
    }

    if args.clear_history {
        store.clear(&args.category);
        persist_or_exit(&store, &config);
        println!(
            "{}",
            format!("Cleared all conversations under category '{}'.", args.category).green()
        );
        return Ok(());
    }

    if args.prompt.is_empty() {
        print_usage();
        process::exit(1);
    }
    let prompt = args.prompt.join(" ");

    let chat_id = match (&args.chat_id, args.new_conversation) {
        (Some(chat_id), false) => chat_id.clone(),
        _ => {
            let chat_id = uuid::Uuid::new_v4().to_string();
            eprintln!(
                "{}",
                format!(
                    "Conversation id: {} (pass --chat-id {} to continue it)",
                    chat_id, chat_id
                )
                .dimmed()
            );
            chat_id
        }
    };

    // Register the conversation before the model turn, as the request path
    // always does
    store.save(&args.category, &chat_id);

    let tools = if config.tools_enabled && args.category == "travel" {
        Some(ToolRegistry::new(AmapClient::new(&config.amap)))
    } else {
        None
    };

    let context = ChatContext {
        config,
        memory,
        tools,
    };
    let result = chat::run_turn(&context, &args.category, &chat_id, &prompt).await;

    // Persist on every exit path, including a failed turn
    persist_or_exit(&store, &context.config);

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }

    Ok(())
}

fn persist_or_exit(store: &ChatHistoryStore, config: &Config) {
    if let Err(e) = store.persist(&config.storage) {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("{}", "Usage: wayfarer [OPTIONS] <prompt>".red());
    eprintln!(
        "{}",
        "  -c, --category <CATEGORY>  Conversation category (default: chat)".dimmed()
    );
    eprintln!(
        "{}",
        "      --chat-id <CHAT_ID>    Continue an existing conversation".dimmed()
    );
    eprintln!(
        "{}",
        "  -n, --new                  Start a new conversation".dimmed()
    );
    eprintln!(
        "{}",
        "      --list                 List conversation ids under the category".dimmed()
    );
    eprintln!(
        "{}",
        "      --delete <CHAT_ID>     Delete one conversation".dimmed()
    );
    eprintln!(
        "{}",
        "      --clear                Clear the category's conversations".dimmed()
    );
    eprintln!(
        "{}",
        "      --no-tools             Disable map tools for this turn".dimmed()
    );
}
