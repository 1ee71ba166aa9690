//! 対話セッションの画面状態
//!
//! 状態は呼び出し側が所有して明示的に渡す。
//! 同じ内容の連続送信（二重送信）を防ぐ。

use crate::error::{DefectLookupError, Result};
use defect_lookup_common::{normalize_setup_id, FeedbackDraft};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// 検索結果を表示中
    #[default]
    Viewing,
    /// 送信処理中
    Submitting,
    /// 直前の送信が完了
    Confirmed,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SubmissionState,
    setup_id: Option<String>,
    operator: Option<String>,
    pending: Option<String>,
    last_submitted: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// 現在表示中のセットアップ番号
    pub fn setup_id(&self) -> Option<&str> {
        self.setup_id.as_deref()
    }

    /// 前回送信時のオペレーター名（入力欄の初期値用）
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    /// 検索結果の表示に移る
    pub fn view(&mut self, setup_id: &str) {
        self.state = SubmissionState::Viewing;
        self.setup_id = Some(setup_id.trim().to_string()).filter(|s| !s.is_empty());
    }

    /// 送信開始。処理中または直前と同一内容なら拒否する
    pub fn begin_submit(&mut self, draft: &FeedbackDraft) -> Result<()> {
        if self.state == SubmissionState::Submitting {
            return Err(DefectLookupError::Input("送信処理中です".into()));
        }

        let fingerprint = fingerprint(draft);
        if self.state == SubmissionState::Confirmed
            && self.last_submitted.as_deref() == Some(fingerprint.as_str())
        {
            return Err(DefectLookupError::Input("同じフィードバックは送信済みです".into()));
        }

        self.state = SubmissionState::Submitting;
        self.pending = Some(fingerprint);
        self.operator = Some(draft.operator.trim().to_string()).filter(|s| !s.is_empty());
        Ok(())
    }

    /// 送信結果を反映。失敗時は再送できるよう表示状態に戻す
    pub fn finish_submit(&mut self, succeeded: bool) {
        let pending = self.pending.take();
        if succeeded {
            self.state = SubmissionState::Confirmed;
            self.last_submitted = pending;
        } else {
            self.state = SubmissionState::Viewing;
        }
    }
}

/// 送信内容の指紋（SHA-256）
fn fingerprint(draft: &FeedbackDraft) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_setup_id(&draft.setup_id).as_bytes());
    hasher.update([0u8]);
    hasher.update(draft.operator.trim().as_bytes());
    hasher.update([0u8]);
    hasher.update(draft.feedback.trim().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str) -> FeedbackDraft {
        FeedbackDraft::new("S1", "Jo", text)
    }

    #[test]
    fn test_submit_cycle() {
        let mut session = Session::new();
        session.view(" S1 ");
        assert_eq!(session.setup_id(), Some("S1"));
        assert_eq!(session.state(), SubmissionState::Viewing);

        session.begin_submit(&draft("loose bolt")).unwrap();
        assert_eq!(session.state(), SubmissionState::Submitting);

        session.finish_submit(true);
        assert_eq!(session.state(), SubmissionState::Confirmed);
        assert_eq!(session.operator(), Some("Jo"));
    }

    #[test]
    fn test_duplicate_submission_rejected() {
        let mut session = Session::new();
        session.begin_submit(&draft("loose bolt")).unwrap();
        session.finish_submit(true);

        // 空白違いも同一とみなす
        let again = FeedbackDraft::new("s1 ", " Jo", "loose bolt ");
        assert!(matches!(session.begin_submit(&again), Err(DefectLookupError::Input(_))));

        // 内容が違えば送信可
        session.begin_submit(&draft("worn belt")).unwrap();
    }

    #[test]
    fn test_same_text_allowed_after_new_lookup() {
        let mut session = Session::new();
        session.begin_submit(&draft("loose bolt")).unwrap();
        session.finish_submit(true);

        session.view("S1");
        session.begin_submit(&draft("loose bolt")).unwrap();
    }

    #[test]
    fn test_concurrent_submit_rejected() {
        let mut session = Session::new();
        session.begin_submit(&draft("a")).unwrap();
        assert!(session.begin_submit(&draft("b")).is_err());
    }

    #[test]
    fn test_failed_submit_can_retry() {
        let mut session = Session::new();
        session.begin_submit(&draft("a")).unwrap();
        session.finish_submit(false);
        assert_eq!(session.state(), SubmissionState::Viewing);
        session.begin_submit(&draft("a")).unwrap();
    }
}
