use models::models::alcohol::{AlcoholSearchParams, AlcoholSummary};
use services::services::admin::AdminClient;

use super::delete;
use crate::{
    cli::AlcoholCommands,
    support::{Output, or_dash, query_data, with_spinner},
};

fn print_rows(rows: &[AlcoholSummary]) {
    println!("{:>6}  {:<13}  NAME", "ID", "CATEGORY");
    for alcohol in rows {
        println!(
            "{:>6}  {:<13}  {} ({})",
            alcohol.id, alcohol.category, alcohol.kor_name, alcohol.eng_name
        );
    }
}

pub async fn run(admin: &AdminClient, command: AlcoholCommands, out: Output) -> anyhow::Result<()> {
    let alcohols = admin.alcohols();
    match command {
        AlcoholCommands::Search {
            keyword,
            category,
            region_id,
            page,
        } => {
            let params = AlcoholSearchParams {
                keyword,
                category,
                region_id,
                page: page.page,
                size: page.size,
            };
            let page = query_data(with_spinner("Searching", alcohols.list(&params)).await)?;
            out.emit(page.as_ref(), |page| {
                print_rows(&page.items);
                println!("page {} of {}, {} total", page.meta.page + 1, page.meta.total_pages.max(1), page.meta.total_elements);
            })
        }
        AlcoholCommands::Show { id } => {
            let alcohol = query_data(with_spinner("Loading whisky", alcohols.detail(Some(id))).await)?;
            out.emit(alcohol.as_ref(), |a| {
                println!("{} / {} (#{})", a.kor_name, a.eng_name, a.id);
                println!("  category: {}", a.category);
                println!("  image:    {}", or_dash(a.image_url.as_deref()));
                let tags: Vec<&str> = a.tasting_tags.iter().map(|t| t.kor_name.as_str()).collect();
                println!("  tags:     {}", if tags.is_empty() { "-".to_string() } else { tags.join(", ") });
            })
        }
        AlcoholCommands::Delete(args) => delete(alcohols, args.id, args.yes).await,
    }
}
