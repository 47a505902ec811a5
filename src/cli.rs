use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sublet_images_common::{ListingUpdate, PropertyType};

#[derive(Parser)]
#[command(name = "sublet-images")]
#[command(about = "サブレット物件の画像編集・保存ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 自分のリスティング一覧を表示
    List,

    /// リスティングの画像一覧を表示
    Show {
        /// リスティングID
        #[arg(required = true)]
        listing: String,
    },

    /// 画像を追加・削除して保存
    Edit {
        /// リスティングID
        #[arg(required = true)]
        listing: String,

        /// 追加する画像ファイル
        #[arg(short, long, num_args = 1..)]
        add: Vec<PathBuf>,

        /// フォルダ内の画像をすべて追加
        #[arg(long)]
        add_dir: Option<PathBuf>,

        /// 削除する画像ID
        #[arg(short, long, num_args = 1..)]
        delete: Vec<String>,

        /// 削除する画像の位置（0始まり、一覧表示の番号-1）
        #[arg(long, num_args = 1..)]
        remove_index: Vec<usize>,

        /// ドライラン（保存せず変更内容を表示）
        #[arg(long)]
        dry_run: bool,
    },

    /// 対話的に画像を編集
    Interactive {
        /// リスティングID
        #[arg(required = true)]
        listing: String,
    },

    /// リスティングの項目を更新
    Update {
        /// リスティングID
        #[arg(required = true)]
        listing: String,

        #[command(flatten)]
        fields: UpdateFields,
    },

    /// 設定を表示/編集
    Config {
        /// 認証トークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// APIのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct UpdateFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// 月額賃料
    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    /// 物件種別 (Apartment/House/Condo/Townhouse/Studio/Loft/Duplex/Room)
    #[arg(long)]
    pub property_type: Option<PropertyType>,

    #[arg(long)]
    pub bedrooms: Option<u32>,

    #[arg(long)]
    pub bathrooms: Option<f64>,

    /// 入居可能日 (YYYY-MM-DD)
    #[arg(long)]
    pub available_from: Option<chrono::NaiveDate>,

    /// 退去日 (YYYY-MM-DD)
    #[arg(long)]
    pub available_to: Option<chrono::NaiveDate>,

    #[arg(long)]
    pub amenities: Option<String>,
}

impl From<UpdateFields> for ListingUpdate {
    fn from(fields: UpdateFields) -> Self {
        ListingUpdate {
            title: fields.title,
            description: fields.description,
            price: fields.price,
            address: fields.address,
            city: fields.city,
            state: fields.state,
            property_type: fields.property_type,
            bedrooms: fields.bedrooms,
            bathrooms: fields.bathrooms,
            available_from: fields.available_from,
            available_to: fields.available_to,
            amenities: fields.amenities,
        }
    }
}
