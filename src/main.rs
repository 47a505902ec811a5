use clap::Parser;
use indicatif::ProgressBar;
use std::time::Duration;
use sublet_images::{api, cli, config, error, interactive, reconciler, scanner, session};
use sublet_images_common::ListingUpdate;
use api::{HttpListingApi, ListingApi};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, SubletError};
use reconciler::SaveSummary;
use session::EditSession;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "sublet_images=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_images(session: &EditSession) {
    for line in interactive::render_lines(session.staging()) {
        println!("{}", line);
    }
    if session.staging().is_empty() {
        println!("  （画像なし）");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::List => {
            let credential = config.credential().ok_or(SubletError::Unauthenticated)?;
            let api = HttpListingApi::from_config(&config)?;

            let listings = api.my_listings(&credential).await?;
            if listings.is_empty() {
                println!("リスティングがありません");
            }
            for listing in &listings {
                println!("{}  {}  (画像{}枚)", listing.id, listing.title, listing.images.len());
            }
        }

        Commands::Show { listing } => {
            let credential = config.credential().ok_or(SubletError::Unauthenticated)?;
            let api = HttpListingApi::from_config(&config)?;

            let session = EditSession::open(&api, &listing, &credential).await?;
            let detail = session.listing();
            println!("🏠 {} - {}, {}", detail.title, detail.city, detail.state);
            if let Some(price) = detail.price {
                println!("  賃料: ${:.0}", price);
            }
            println!("画像 {}枚:", session.staging().len());
            print_images(&session);
        }

        Commands::Edit { listing, add, add_dir, delete, remove_index, dry_run } => {
            println!("🏠 sublet-images - 画像編集\n");
            let credential = config.credential().ok_or(SubletError::Unauthenticated)?;
            let api = HttpListingApi::from_config(&config)?;

            // 1. 取得
            println!("[1/3] リスティングを取得中...");
            let mut session = EditSession::open(&api, &listing, &credential).await?;
            println!("✔ {}枚の画像\n", session.staging().len());

            // 2. 変更を反映
            println!("[2/3] 変更を反映中...");
            // 位置指定は大きい方から外す（先に外すと番号がずれる）
            let mut indices = remove_index;
            indices.sort_unstable_by(|a, b| b.cmp(a));
            indices.dedup();
            for index in indices {
                session.remove_at(index)?;
            }
            for image_id in &delete {
                if !session.staging_mut().remove_by_id(image_id) {
                    println!("  画像IDが見つかりません: {}", image_id);
                }
            }

            let mut paths = add;
            if let Some(dir) = add_dir {
                paths.extend(scanner::scan_folder(&dir)?);
            }
            if !paths.is_empty() {
                if let Err(err) = session.add_paths(&paths) {
                    println!("{}", SaveSummary::blocked(&err));
                    return Err(err);
                }
            }
            print_images(&session);
            println!(
                "✔ 削除予定 {}件 / 追加 {}件\n",
                session.staging().deletion_queue().len(),
                session.staging().new_files().len()
            );

            // 3. 保存
            if dry_run {
                println!("[3/3] ドライランのため保存しません");
                return Ok(());
            }
            if !session.staging().has_changes() {
                println!("[3/3] 変更はありません");
                return Ok(());
            }

            println!("[3/3] 保存中...");
            let spinner = ProgressBar::new_spinner();
            spinner.enable_steady_tick(Duration::from_millis(100));
            let result = session.save(&api, Some(&credential)).await;
            spinner.finish_and_clear();

            println!("{}", SaveSummary::from_result(&result));
            let outcome = result?;
            if outcome.refreshed {
                print_images(&session);
            }
        }

        Commands::Interactive { listing } => {
            let credential = config.credential().ok_or(SubletError::Unauthenticated)?;
            let api = HttpListingApi::from_config(&config)?;

            let mut session = EditSession::open(&api, &listing, &credential).await?;
            interactive::run_interactive_edit(&api, &mut session, Some(&credential)).await?;
        }

        Commands::Update { listing, fields } => {
            let update = ListingUpdate::from(fields);
            if update.is_empty() {
                println!("更新する項目を指定してください");
                return Ok(());
            }
            update.validate()?;

            let credential = config.credential().ok_or(SubletError::Unauthenticated)?;
            let api = HttpListingApi::from_config(&config)?;
            let updated = api.update_listing(&listing, &update, &credential).await?;
            println!("✔ 更新しました: {} ({})", updated.title, updated.id);
        }

        Commands::Config { set_token, set_api_url, show } => {
            let mut config = config;

            if let Some(token) = set_token {
                config.set_token(token)?;
                println!("✔ トークンを設定しました");
            }

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API: {}", config.api_base_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  トークン: {}", if config.credential().is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
