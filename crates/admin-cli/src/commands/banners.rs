use models::models::banner::{BannerListParams, BannerSummary};
use services::services::{
    admin::AdminClient, banner::BannerStatusChange, mutation::MutationOptions,
};

use super::{delete, move_row, report, save};
use crate::{
    cli::BannerCommands,
    support::{Output, or_dash, query_data, with_spinner, yes_no},
};

fn print_rows(rows: &[BannerSummary]) {
    println!("{:>3}  {:>6}  {:>5}  {:<6}  {:<12}  NAME", "#", "ID", "ORDER", "ACTIVE", "TYPE");
    for (row, banner) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:>6}  {:>5}  {:<6}  {:<12}  {}",
            row + 1,
            banner.id,
            banner.sort_order,
            yes_no(banner.is_active),
            banner.banner_type,
            banner.name
        );
    }
}

pub async fn run(admin: &AdminClient, command: BannerCommands, out: Output) -> anyhow::Result<()> {
    let banners = admin.banners();
    match command {
        BannerCommands::List {
            keyword,
            active,
            page,
        } => {
            let params = BannerListParams {
                keyword,
                is_active: active,
                page: page.page,
                size: page.size,
            };
            let page = query_data(with_spinner("Loading banners", banners.list(&params)).await)?;
            out.emit(page.as_ref(), |page| print_rows(&page.items))
        }
        BannerCommands::Show { id } => {
            let banner = query_data(with_spinner("Loading banner", banners.detail(Some(id))).await)?;
            out.emit(banner.as_ref(), |b| {
                println!("{} (#{})", b.name, b.id);
                println!("  type:    {}", b.banner_type);
                println!("  active:  {}", yes_no(b.is_active));
                println!("  order:   {}", b.sort_order);
                println!("  image:   {}", or_dash(b.image_url.as_deref()));
                println!("  target:  {}", or_dash(b.target_url.as_deref()));
                if let (Some(start), Some(end)) = (b.start_date, b.end_date) {
                    println!("  period:  {start} ~ {end}");
                }
            })
        }
        BannerCommands::Save {
            target,
            name,
            banner_type,
            image_url,
            target_url,
            description,
            active,
        } => {
            let outcome = save(banners, &target, |form| {
                if let Some(name) = name {
                    form.name = name;
                }
                if let Some(banner_type) = banner_type {
                    form.banner_type = banner_type;
                }
                if image_url.is_some() {
                    form.image_url = image_url;
                }
                if target_url.is_some() {
                    form.target_url = target_url;
                }
                if description.is_some() {
                    form.description = description;
                }
                if let Some(active) = active {
                    form.is_active = active;
                }
            })
            .await?;
            report(outcome, "banner");
            Ok(())
        }
        BannerCommands::Delete(args) => delete(banners, args.id, args.yes).await,
        BannerCommands::Move(args) => {
            let page = query_data(banners.list(&BannerListParams::default()).await)?;
            let saved = move_row(
                page.items.clone(),
                args.from,
                args.to,
                &banners.reorder_persister(),
                admin.notifier().as_ref(),
            )
            .await?;
            out.emit(saved.as_slice(), print_rows)
        }
        BannerCommands::Status { id, active } => {
            banners
                .update_status(MutationOptions::new().success_message(if active {
                    "배너가 활성화되었습니다."
                } else {
                    "배너가 비활성화되었습니다."
                }))
                .mutate_async(BannerStatusChange {
                    id,
                    is_active: active,
                })
                .await?;
            Ok(())
        }
    }
}
