// Copyright 2025 Cowboy AI, LLC.

//! Property-based tests for the change request aggregate
//!
//! Verifies the properties the event sourcing design hinges on, for
//! arbitrary command and event sequences: replay determinism, totality of
//! both functions, terminal closure, and retry safety of no-op acceptance.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use changeflow_domain::{
    apply, decide, fold, initial_state, replay, ChangeRequestCommand, ChangeRequestEvent,
    ChangeRequestId, ChangeRequestState, GitChangeContext, ScmType,
};

fn test_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 19, 12, 0, 0).unwrap()
}

fn mr_url() -> String {
    "https://gitlab.example.com/infra/terraform/-/merge_requests/42".into()
}

fn cr_id() -> ChangeRequestId {
    ChangeRequestId::from_url(&mr_url())
}

fn git_context() -> GitChangeContext {
    GitChangeContext {
        repository_url: "git@gitlab.example.com:infra/terraform.git".into(),
        source_branch_ref: "feature/vpc".into(),
        target_branch_ref: "main".into(),
    }
}

fn arb_command() -> impl Strategy<Value = ChangeRequestCommand> {
    prop_oneof![
        Just(ChangeRequestCommand::Create {
            id: cr_id(),
            change_request_url: mr_url(),
            git_change_context: git_context(),
            source_scm_type: ScmType::Gitlab,
        }),
        Just(ChangeRequestCommand::PushCode { id: cr_id() }),
        Just(ChangeRequestCommand::RequestPlan { id: cr_id() }),
        (".{0,16}", any::<bool>()).prop_map(|(output_plan, success)| {
            ChangeRequestCommand::SubmitPlanResult {
                id: cr_id(),
                output_plan,
                success,
            }
        }),
        Just(ChangeRequestCommand::RequestApply { id: cr_id() }),
        (".{0,16}", any::<bool>()).prop_map(|(output_apply, success)| {
            ChangeRequestCommand::SubmitApplyResult {
                id: cr_id(),
                output_apply,
                success,
            }
        }),
        Just(ChangeRequestCommand::RequestMerge { id: cr_id() }),
        any::<bool>().prop_map(|success| ChangeRequestCommand::SubmitMergeResult {
            id: cr_id(),
            success,
        }),
    ]
}

fn arb_event() -> impl Strategy<Value = ChangeRequestEvent> {
    prop_oneof![
        Just(ChangeRequestEvent::created(
            cr_id(),
            test_timestamp(),
            mr_url(),
            git_context(),
            ScmType::Gitlab,
        )),
        Just(ChangeRequestEvent::code_pushed(cr_id(), test_timestamp())),
        Just(ChangeRequestEvent::plan_requested(cr_id(), test_timestamp())),
        (".{0,16}", any::<bool>()).prop_map(|(output, success)| {
            ChangeRequestEvent::code_planned(cr_id(), test_timestamp(), output, success)
        }),
        Just(ChangeRequestEvent::apply_requested(cr_id(), test_timestamp())),
        (".{0,16}", any::<bool>()).prop_map(|(output, success)| {
            ChangeRequestEvent::code_applied(cr_id(), test_timestamp(), output, success)
        }),
        Just(ChangeRequestEvent::code_merged(cr_id(), test_timestamp())),
    ]
}

proptest! {
    /// Replaying any event sequence is total and deterministic.
    #[test]
    fn replay_is_deterministic(events in proptest::collection::vec(arb_event(), 0..64)) {
        let first = replay(&events);
        let second = replay(&events);
        prop_assert_eq!(first, second);
    }

    /// Replay never loses the aggregate identity once a creation is seen.
    #[test]
    fn identity_is_stable_after_creation(events in proptest::collection::vec(arb_event(), 0..64)) {
        let mut created = false;
        let mut state = initial_state();
        for event in &events {
            created = created || matches!(event, ChangeRequestEvent::Created { .. });
            state = apply(state, event);
            if created {
                prop_assert_eq!(state.id(), Some(&cr_id()));
            }
        }
    }

    /// Driving arbitrary commands through decide/fold keeps the replay
    /// contract: the recorded stream always reproduces the current state.
    #[test]
    fn decide_and_fold_agree_with_replay(commands in proptest::collection::vec(arb_command(), 0..64)) {
        let mut state = initial_state();
        let mut history: Vec<ChangeRequestEvent> = Vec::new();

        for command in &commands {
            if let Ok(events) = decide(command, &state, test_timestamp()) {
                state = fold(state, &events);
                history.extend(events);
            }
        }

        prop_assert_eq!(replay(&history), state);
    }

    /// Once closed, every command is rejected and every event is ignored.
    #[test]
    fn closed_is_terminal(
        commands in proptest::collection::vec(arb_command(), 0..16),
        events in proptest::collection::vec(arb_event(), 0..16),
    ) {
        let closed = ChangeRequestState::Closed { id: cr_id() };

        for command in &commands {
            prop_assert!(decide(command, &closed, test_timestamp()).is_err());
        }
        let state = fold(closed.clone(), &events);
        prop_assert_eq!(state, closed);
    }

    /// Re-submitting redundant commands while an apply is in flight yields an
    /// empty event sequence every time and never moves state.
    #[test]
    fn noop_acceptance_is_retry_safe(count in 1usize..32) {
        let state = ChangeRequestState::Applying {
            id: cr_id(),
            change_request_url: mr_url(),
            git_change_context: git_context(),
            source_scm_type: ScmType::Gitlab,
            scm_requests: vec![],
        };
        let command = ChangeRequestCommand::RequestApply { id: cr_id() };

        for _ in 0..count {
            let events = decide(&command, &state, test_timestamp()).unwrap();
            prop_assert!(events.is_empty());
            prop_assert_eq!(&fold(state.clone(), &events), &state);
        }
    }

    /// Ordering precondition: an apply result is only accepted while an
    /// apply is in flight.
    #[test]
    fn apply_result_requires_applying(output in ".{0,16}", success in any::<bool>()) {
        let command = ChangeRequestCommand::SubmitApplyResult {
            id: cr_id(),
            output_apply: output,
            success,
        };

        let in_progress = ChangeRequestState::InProgress {
            id: cr_id(),
            change_request_url: mr_url(),
            git_change_context: git_context(),
            source_scm_type: ScmType::Gitlab,
            scm_requests: vec![],
        };

        prop_assert!(decide(&command, &initial_state(), test_timestamp()).is_err());
        prop_assert!(decide(&command, &in_progress, test_timestamp()).is_err());
    }
}
