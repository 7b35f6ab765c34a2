use models::models::{alcohol::AlcoholSummary, curation::{CurationListParams, CurationSummary}};
use services::services::{
    admin::AdminClient, membership::MembershipEditor, mutation::MutationOptions,
};

use super::{delete, move_row, report, save};
use crate::{
    cli::CurationCommands,
    support::{Output, or_dash, query_data, with_spinner, yes_no},
};

fn print_rows(rows: &[CurationSummary]) {
    println!("{:>3}  {:>6}  {:>5}  {:<6}  {:>8}  NAME", "#", "ID", "ORDER", "ACTIVE", "WHISKIES");
    for (row, curation) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:>6}  {:>5}  {:<6}  {:>8}  {}",
            row + 1,
            curation.id,
            curation.display_order,
            yes_no(curation.is_active),
            curation.alcohol_count,
            curation.name
        );
    }
}

pub(super) fn print_members(members: &[AlcoholSummary]) {
    for alcohol in members {
        println!("  - {:>6}  {} ({})", alcohol.id, alcohol.kor_name, alcohol.eng_name);
    }
}

pub async fn run(admin: &AdminClient, command: CurationCommands, out: Output) -> anyhow::Result<()> {
    let curations = admin.curations();
    match command {
        CurationCommands::List {
            keyword,
            active,
            page,
        } => {
            let params = CurationListParams {
                keyword,
                is_active: active,
                page: page.page,
                size: page.size,
            };
            let page = query_data(with_spinner("Loading curations", curations.list(&params)).await)?;
            out.emit(page.as_ref(), |page| print_rows(&page.items))
        }
        CurationCommands::Show { id } => {
            let curation =
                query_data(with_spinner("Loading curation", curations.detail(Some(id))).await)?;
            out.emit(curation.as_ref(), |c| {
                println!("{} (#{})", c.name, c.id);
                println!("  active:  {}", yes_no(c.is_active));
                println!("  order:   {}", c.display_order);
                println!("  cover:   {}", or_dash(c.cover_image_url.as_deref()));
                println!("  whiskies ({}):", c.alcohols.len());
                print_members(&c.alcohols);
            })
        }
        CurationCommands::Save {
            target,
            name,
            description,
            cover_image_url,
            active,
        } => {
            let outcome = save(curations, &target, |form| {
                if let Some(name) = name {
                    form.name = name;
                }
                if description.is_some() {
                    form.description = description;
                }
                if cover_image_url.is_some() {
                    form.cover_image_url = cover_image_url;
                }
                if let Some(active) = active {
                    form.is_active = active;
                }
            })
            .await?;
            report(outcome, "curation");
            Ok(())
        }
        CurationCommands::Delete(args) => delete(curations, args.id, args.yes).await,
        CurationCommands::Move(args) => {
            let page = query_data(curations.list(&CurationListParams::default()).await)?;
            let saved = move_row(
                page.items.clone(),
                args.from,
                args.to,
                &curations.reorder_persister(),
                admin.notifier().as_ref(),
            )
            .await?;
            out.emit(saved.as_slice(), print_rows)
        }
        CurationCommands::AddAlcohols { id, alcohol_ids } => {
            let curation = query_data(curations.detail(Some(id)).await)?;
            let mut editor = MembershipEditor::new(id, curation.alcohols.clone());

            let alcohols = admin.alcohols();
            let mut picked = Vec::with_capacity(alcohol_ids.len());
            for alcohol_id in alcohol_ids {
                let detail = query_data(alcohols.detail(Some(alcohol_id)).await)?;
                picked.push(AlcoholSummary {
                    id: detail.id,
                    kor_name: detail.kor_name.clone(),
                    eng_name: detail.eng_name.clone(),
                    category: detail.category,
                    image_url: detail.image_url.clone(),
                });
            }

            let add = curations.add_alcohols(MutationOptions::new().success_message("위스키가 추가되었습니다."));
            with_spinner("Adding whiskies", editor.add(picked, &add)).await?;
            out.emit(editor.confirmed(), print_members)
        }
        CurationCommands::RemoveAlcohol { id, alcohol_id } => {
            let curation = query_data(curations.detail(Some(id)).await)?;
            let mut editor = MembershipEditor::new(id, curation.alcohols.clone());
            let remove = curations.remove_alcohols(MutationOptions::new().success_message("위스키가 제외되었습니다."));
            with_spinner("Removing whisky", editor.remove(vec![alcohol_id], &remove)).await?;
            out.emit(editor.confirmed(), print_members)
        }
    }
}
