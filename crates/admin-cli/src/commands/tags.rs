use models::models::tasting_tag::{TastingTagListParams, TastingTagSummary};
use services::services::{
    admin::AdminClient, membership::MembershipChange, mutation::MutationOptions,
};

use super::{curations::print_members, delete, report, save};
use crate::{
    cli::TagCommands,
    support::{Output, or_dash, query_data, with_spinner},
};

fn print_rows(rows: &[TastingTagSummary]) {
    println!("{:>6}  {:>8}  NAME", "ID", "WHISKIES");
    for tag in rows {
        println!("{:>6}  {:>8}  {} / {}", tag.id, tag.alcohol_count, tag.kor_name, tag.eng_name);
    }
}

pub async fn run(admin: &AdminClient, command: TagCommands, out: Output) -> anyhow::Result<()> {
    let tags = admin.tasting_tags();
    match command {
        TagCommands::List { keyword, page } => {
            let params = TastingTagListParams {
                keyword,
                page: page.page,
                size: page.size,
            };
            let page = query_data(with_spinner("Loading tags", tags.list(&params)).await)?;
            out.emit(page.as_ref(), |page| print_rows(&page.items))
        }
        TagCommands::Show { id } => {
            let tag = query_data(with_spinner("Loading tag", tags.detail(Some(id))).await)?;
            out.emit(tag.as_ref(), |t| {
                println!("{} / {} (#{})", t.kor_name, t.eng_name, t.id);
                println!("  icon:  {}", or_dash(t.icon.as_deref()));
                println!("  about: {}", or_dash(t.description.as_deref()));
                println!("  whiskies ({}):", t.alcohols.len());
                print_members(&t.alcohols);
            })
        }
        TagCommands::Save {
            target,
            kor_name,
            eng_name,
            icon,
            description,
        } => {
            let outcome = save(tags, &target, |form| {
                if let Some(kor_name) = kor_name {
                    form.kor_name = kor_name;
                }
                if let Some(eng_name) = eng_name {
                    form.eng_name = eng_name;
                }
                if icon.is_some() {
                    form.icon = icon;
                }
                if description.is_some() {
                    form.description = description;
                }
            })
            .await?;
            report(outcome, "tasting tag");
            Ok(())
        }
        TagCommands::Delete(args) => delete(tags, args.id, args.yes).await,
        TagCommands::Connect { id, alcohol_ids } => {
            tags.connect_alcohols(MutationOptions::new().success_message("위스키가 연결되었습니다."))
                .mutate_async(MembershipChange {
                    owner_id: id,
                    alcohol_ids,
                })
                .await?;
            Ok(())
        }
        TagCommands::Disconnect { id, alcohol_ids } => {
            tags.disconnect_alcohols(MutationOptions::new().success_message("연결이 해제되었습니다."))
                .mutate_async(MembershipChange {
                    owner_id: id,
                    alcohol_ids,
                })
                .await?;
            Ok(())
        }
    }
}
