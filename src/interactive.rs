//! 対話式画像編集モジュール
//!
//! カルーセルと同じ操作（次へ・前へ・追加・削除）を端末で行い、
//! 最後にまとめて保存する。

use crate::api::ListingApi;
use crate::auth::Credential;
use crate::error::Result;
use crate::reconciler::SaveSummary;
use crate::session::EditSession;
use dialoguer::{Input, Select};
use std::path::PathBuf;
use sublet_images_common::{ImageStaging, Removed, StagedImage};

/// 対話アクション
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// 次の画像
    Next,
    /// 前の画像
    Prev,
    /// 番号で選択（0始まり）
    Select(usize),
    /// ファイルを追加
    Add(Vec<PathBuf>),
    /// 表示中の画像を外す
    RemoveCurrent,
    /// 保存
    Save,
    /// 保存せず終了
    Quit,
}

/// 画像一覧を表示用の行に変換（選択中に `>` を付ける）
pub fn render_lines(staging: &ImageStaging) -> Vec<String> {
    staging
        .images()
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let marker = if staging.selection() == Some(i) { ">" } else { " " };
            match image {
                StagedImage::Existing { id, url } => format!("{} [{}] {} ({})", marker, i + 1, url, id),
                StagedImage::New { preview_url, .. } => {
                    format!("{} [{}] {} (未保存)", marker, i + 1, preview_url)
                }
            }
        })
        .collect()
}

/// 保存以外のアクションを適用。表示するメッセージを返す
pub fn apply_action(session: &mut EditSession, action: &EditAction) -> Result<String> {
    let message = match action {
        EditAction::Next => {
            session.staging_mut().next();
            selection_label(session.staging())
        }
        EditAction::Prev => {
            session.staging_mut().prev();
            selection_label(session.staging())
        }
        EditAction::Select(index) => {
            if session.staging_mut().select_at(*index) {
                selection_label(session.staging())
            } else {
                format!("番号 {} はありません", index + 1)
            }
        }
        EditAction::Add(paths) => {
            let handles = session.add_paths(paths)?;
            format!("{}枚追加しました（残り{}枚）", handles.len(), session.staging().remaining_capacity())
        }
        EditAction::RemoveCurrent => match session.staging().selection() {
            None => "画像がありません".to_string(),
            Some(index) => match session.remove_at(index)? {
                Removed::New(_) => "未保存の画像を取り消しました".to_string(),
                Removed::Existing { id, .. } => format!("画像 {} を削除予定にしました", id),
            },
        },
        EditAction::Save | EditAction::Quit => String::new(),
    };
    Ok(message)
}

fn selection_label(staging: &ImageStaging) -> String {
    match (staging.selection(), staging.selected()) {
        (Some(i), Some(image)) => format!("{}/{}: {}", i + 1, staging.len(), image.display_url()),
        _ => "画像がありません".to_string(),
    }
}

fn prompt_action(staging: &ImageStaging) -> Result<EditAction> {
    let items = [
        "次へ",
        "前へ",
        "番号で選択",
        "画像を追加",
        "表示中の画像を削除",
        "保存",
        "保存せず終了",
    ];

    let choice = Select::new()
        .with_prompt("操作")
        .items(&items)
        .default(0)
        .interact()?;

    let action = match choice {
        0 => EditAction::Next,
        1 => EditAction::Prev,
        2 => {
            let number: usize = Input::new()
                .with_prompt(format!("番号 (1-{})", staging.len().max(1)))
                .interact_text()?;
            EditAction::Select(number.saturating_sub(1))
        }
        3 => {
            let raw: String = Input::new()
                .with_prompt("ファイル（スペース区切り）")
                .interact_text()?;
            EditAction::Add(raw.split_whitespace().map(PathBuf::from).collect())
        }
        4 => EditAction::RemoveCurrent,
        5 => EditAction::Save,
        _ => EditAction::Quit,
    };
    Ok(action)
}

/// 対話式で画像を編集
pub async fn run_interactive_edit<A>(
    api: &A,
    session: &mut EditSession,
    credential: Option<&Credential>,
) -> Result<()>
where
    A: ListingApi + ?Sized,
{
    println!("🏠 {} ({})", session.listing().title, session.listing_id());

    loop {
        println!("---");
        for line in render_lines(session.staging()) {
            println!("{}", line);
        }
        if session.staging().is_empty() {
            println!("  （画像なし）");
        }
        println!(
            "削除予定: {}件 / 追加: {}件",
            session.staging().deletion_queue().len(),
            session.staging().new_files().len()
        );

        let action = prompt_action(session.staging())?;
        match action {
            EditAction::Save => {
                let result = session.save(api, credential).await;
                println!("{}", SaveSummary::from_result(&result));
                if result.is_err() {
                    continue;
                }
            }
            EditAction::Quit => {
                if session.staging().has_changes() {
                    println!("変更を破棄して終了します");
                }
                break;
            }
            other => match apply_action(session, &other) {
                Ok(message) => println!("  → {}", message),
                // 上限超過などは操作をブロックするだけで続行
                Err(err) => println!("  ✖ {}", SaveSummary::blocked(&err)),
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sublet_images_common::{ListingDetail, LocalFile, RemoteImage};

    fn session(ids: &[&str]) -> EditSession {
        EditSession::new(ListingDetail {
            id: "l1".into(),
            images: ids
                .iter()
                .map(|id| RemoteImage::new(*id, format!("https://cdn/{}.jpg", id)))
                .collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_render_lines_marks_selection() {
        let mut s = session(&["a", "b"]);
        s.add_files(vec![LocalFile::new("n.jpg", "image/jpeg", vec![1])]).unwrap();
        s.staging_mut().select_at(1);

        let lines = render_lines(s.staging());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  [1]"));
        assert!(lines[1].starts_with("> [2]"));
        assert!(lines[2].contains("未保存"));
    }

    #[test]
    fn test_apply_navigation() {
        let mut s = session(&["a", "b", "c"]);
        apply_action(&mut s, &EditAction::Prev).unwrap();
        assert_eq!(s.staging().selection(), Some(2));
        apply_action(&mut s, &EditAction::Next).unwrap();
        assert_eq!(s.staging().selection(), Some(0));

        let message = apply_action(&mut s, &EditAction::Select(9)).unwrap();
        assert!(message.contains("ありません"));
        assert_eq!(s.staging().selection(), Some(0));
    }

    #[test]
    fn test_apply_remove_current_last() {
        let mut s = session(&["a", "b"]);
        s.staging_mut().select_at(1);
        apply_action(&mut s, &EditAction::RemoveCurrent).unwrap();
        assert_eq!(s.staging().selection(), Some(0));
        assert_eq!(s.staging().deletion_queue().ids(), &["b".to_string()]);

        apply_action(&mut s, &EditAction::RemoveCurrent).unwrap();
        assert_eq!(s.staging().selection(), None);

        let message = apply_action(&mut s, &EditAction::RemoveCurrent).unwrap();
        assert_eq!(message, "画像がありません");
    }

    #[test]
    fn test_apply_add_missing_file_fails() {
        let mut s = session(&[]);
        let result = apply_action(&mut s, &EditAction::Add(vec![PathBuf::from("/nonexistent/x.jpg")]));
        assert!(result.is_err());
        assert!(s.staging().is_empty());
    }
}
