use models::models::help::{HelpAnswerRequest, HelpListParams, HelpSummary};
use services::services::{admin::AdminClient, mutation::MutationOptions};

use crate::{
    cli::HelpCommands,
    support::{Output, or_dash, query_data, with_spinner},
};

fn print_rows<'a>(rows: impl Iterator<Item = &'a HelpSummary>) {
    println!("{:>6}  {:<8}  {:<12}  TITLE", "ID", "STATUS", "FROM");
    for help in rows {
        println!(
            "{:>6}  {:<8}  {:<12}  {}",
            help.id,
            help.status,
            or_dash(help.user_nickname.as_deref()),
            help.title
        );
    }
}

pub async fn run(admin: &AdminClient, command: HelpCommands, out: Output) -> anyhow::Result<()> {
    let helps = admin.helps();
    match command {
        HelpCommands::List {
            status,
            page_size,
            pages,
        } => {
            let inbox = helps.list(HelpListParams { status, page_size });
            let mut data = query_data(with_spinner("Loading inquiries", inbox.fetch()).await)?;
            for _ in 1..pages {
                if !data.has_next_page() {
                    break;
                }
                data = query_data(inbox.fetch_next_page().await)?;
            }
            let items: Vec<&HelpSummary> = data.items().collect();
            out.emit(items.as_slice(), |items| print_rows(items.iter().copied()))?;
            if data.has_next_page() && !out.json {
                println!("(more available, use --pages to load further)");
            }
            Ok(())
        }
        HelpCommands::Show { id } => {
            let help = query_data(with_spinner("Loading inquiry", helps.detail(Some(id))).await)?;
            out.emit(help.as_ref(), |h| {
                println!("{} (#{}, {})", h.title, h.id, h.status);
                println!("  from:   {}", or_dash(h.user_nickname.as_deref()));
                println!();
                println!("{}", h.content);
                if let Some(answer) = &h.response_content {
                    println!();
                    println!("answer: {answer}");
                }
            })
        }
        HelpCommands::Answer {
            id,
            content,
            status,
        } => {
            helps
                .answer(MutationOptions::new().success_message("답변이 등록되었습니다."))
                .mutate_async((
                    id,
                    HelpAnswerRequest {
                        response_content: content,
                        status,
                    },
                ))
                .await?;
            Ok(())
        }
    }
}
