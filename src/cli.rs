use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(about = "Conversational AI assistant with persistent chat history", long_about = None)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "category",
        default_value = "chat",
        help = "Conversation category (chat, travel, service, pdf, or any label)"
    )]
    pub category: String,

    #[arg(
        long = "chat-id",
        help = "Conversation id to continue; omit to start a new conversation"
    )]
    pub chat_id: Option<String>,

    #[arg(
        short = 'n',
        long = "new",
        help = "Start a new conversation even if --chat-id is given"
    )]
    pub new_conversation: bool,

    #[arg(long = "list", help = "List conversation ids under the category")]
    pub list_chats: bool,

    #[arg(
        long = "delete",
        value_name = "CHAT_ID",
        help = "Delete one conversation from the category"
    )]
    pub delete_chat: Option<String>,

    #[arg(long = "clear", help = "Clear every conversation under the category")]
    pub clear_history: bool,

    #[arg(long = "no-tools", help = "Disable map tools for this turn")]
    pub no_tools: bool,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostic output")]
    pub verbose: bool,

    #[arg(help = "Prompt to send to the assistant")]
    pub prompt: Vec<String>,
}
