use models::models::{distillery::DistilleryListParams, region::RegionListParams};
use services::services::admin::AdminClient;

use crate::support::{Output, or_dash, query_data, with_spinner};

pub async fn regions(admin: &AdminClient, keyword: Option<String>, out: Output) -> anyhow::Result<()> {
    let params = RegionListParams { keyword };
    let page = query_data(with_spinner("Loading regions", admin.regions().list(&params)).await)?;
    out.emit(page.as_ref(), |page| {
        for region in &page.items {
            println!(
                "{:>6}  {} ({}) [{}]",
                region.id,
                region.kor_name,
                region.eng_name,
                or_dash(region.continent.as_deref())
            );
        }
    })
}

pub async fn distilleries(
    admin: &AdminClient,
    keyword: Option<String>,
    region_id: Option<i64>,
    out: Output,
) -> anyhow::Result<()> {
    let params = DistilleryListParams {
        keyword,
        region_id,
        ..Default::default()
    };
    let page =
        query_data(with_spinner("Loading distilleries", admin.distilleries().list(&params)).await)?;
    out.emit(page.as_ref(), |page| {
        for distillery in &page.items {
            println!("{:>6}  {} ({})", distillery.id, distillery.kor_name, distillery.eng_name);
        }
    })
}
