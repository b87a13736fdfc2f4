//! Integration tests: meal-plan and verification flows against a scripted
//! inference backend.

mod common;

use std::time::Duration;

use common::{CLEAN_PLATE_REPLY, JPEG, MEAL_PLAN_REPLY, PNG, ScriptedInference, session};

use platewise_app::{MealPlanPhase, TriggerOutcome, VerificationPhase, View, WorkflowError};
use platewise_core::{MealSlot, Notice, ProfileField, ValidationFailure};
use platewise_llm::LlmError;

fn fill_profile(session: &platewise_app::Session<ScriptedInference>) {
    session.edit_profile(ProfileField::PreferredFoods, "한식, 생선");
    session.edit_profile(ProfileField::Weight, "70");
    session.edit_profile(ProfileField::Height, "175");
    session.edit_profile(ProfileField::Goal, "lose");
}

// ---------------------------------------------------------------------------
// Meal plan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn incomplete_profile_makes_no_call() {
    let (session, inference) = session(ScriptedInference::new());
    session.edit_profile(ProfileField::Weight, "70");

    let outcome = session.generate_plan().await;

    assert!(matches!(
        outcome,
        TriggerOutcome::Rejected(ValidationFailure::MissingPreferredFoods)
    ));
    assert_eq!(inference.calls(), 0);
    let snapshot = session.meal_plan().snapshot();
    assert_eq!(snapshot.phase, MealPlanPhase::Idle);
    assert_eq!(snapshot.notice, Some(Notice::ProfileIncomplete));
    assert_eq!(
        session.notice_text(View::Profile),
        Some("선호 음식과 체중 정보를 입력해주세요.")
    );
    assert_eq!(session.active_view(), View::Profile);
}

#[tokio::test]
async fn missing_weight_is_rejected() {
    let (session, inference) = session(ScriptedInference::new());
    session.edit_profile(ProfileField::PreferredFoods, "한식");
    session.edit_profile(ProfileField::Weight, "abc");

    let outcome = session.generate_plan().await;

    assert!(matches!(
        outcome,
        TriggerOutcome::Rejected(ValidationFailure::MissingWeight)
    ));
    assert_eq!(inference.calls(), 0);
}

#[tokio::test]
async fn generates_plan_and_switches_view() {
    let (session, inference) = session(ScriptedInference::new().reply(MEAL_PLAN_REPLY));
    fill_profile(&session);

    let outcome = session.generate_plan().await;

    assert!(outcome.is_completed(), "got {outcome:?}");
    assert_eq!(inference.calls(), 1);
    let prompt = &inference.requests()[0].prompt;
    assert!(prompt.contains("70kg"));
    assert!(prompt.contains("BMI: 22.9"));
    assert!(prompt.contains("체중 감량"));
    assert!(inference.requests()[0].image.is_none());

    let snapshot = session.meal_plan().snapshot();
    assert_eq!(snapshot.phase, MealPlanPhase::Ready);
    assert_eq!(snapshot.notice, None);
    let plan = snapshot.plan.expect("plan published");
    assert_eq!(plan.meals().count(), MealSlot::all().len());
    assert!((plan.total_calories - 1400.5).abs() < f64::EPSILON);
    assert_eq!(plan.meal(MealSlot::Lunch).name, "닭가슴살 샐러드");
    assert_eq!(session.active_view(), View::MealPlan);
}

#[tokio::test]
async fn failure_keeps_previous_plan() {
    let (session, _inference) = session(
        ScriptedInference::new()
            .reply(MEAL_PLAN_REPLY)
            .fail(LlmError::Status {
                status: 500,
                body: "boom".into(),
            }),
    );
    fill_profile(&session);
    assert!(session.generate_plan().await.is_completed());
    session.select_view(View::Profile);

    let outcome = session.generate_plan().await;

    assert!(matches!(
        outcome,
        TriggerOutcome::Failed(WorkflowError::Inference(LlmError::Status { status: 500, .. }))
    ));
    let snapshot = session.meal_plan().snapshot();
    assert_eq!(snapshot.phase, MealPlanPhase::Failed);
    assert_eq!(snapshot.notice, Some(Notice::GenerationFailed));
    assert!(snapshot.plan.is_some());
    assert_eq!(snapshot.runs, 2);
    assert_eq!(session.active_view(), View::Profile);
    assert!(!session.is_generating());
}

#[tokio::test]
async fn regenerating_from_ready_replaces_plan() {
    const SECOND_PLAN: &str = r#"{
  "breakfast": {"name": "오트밀", "calories": 500, "description": "복합 탄수화물"},
  "lunch": {"name": "소고기 비빔밥", "calories": 700, "description": "철분"},
  "dinner": {"name": "두부 스테이크", "calories": 600, "description": "식물성 단백질"},
  "totalCalories": 1800,
  "tips": "천천히 드세요."
}"#;
    let (session, inference) =
        session(ScriptedInference::new().reply(MEAL_PLAN_REPLY).reply(SECOND_PLAN));
    fill_profile(&session);
    assert!(session.generate_plan().await.is_completed());
    assert_eq!(session.meal_plan().snapshot().phase, MealPlanPhase::Ready);

    session.edit_profile(ProfileField::Goal, "gain");
    let outcome = session.generate_plan().await;

    assert!(outcome.is_completed(), "got {outcome:?}");
    assert_eq!(inference.calls(), 2);
    let snapshot = session.meal_plan().snapshot();
    assert_eq!(snapshot.phase, MealPlanPhase::Ready);
    assert_eq!(snapshot.runs, 2);
    assert_eq!(snapshot.notice, None);
    let plan = snapshot.plan.expect("plan published");
    assert!((plan.total_calories - 1800.0).abs() < f64::EPSILON);
    assert_eq!(plan.meal(MealSlot::Lunch).name, "소고기 비빔밥");
    assert_eq!(plan.tips, "천천히 드세요.");
    assert!(inference.requests()[1].prompt.contains("체중 증가"));
}

#[tokio::test]
async fn unparseable_reply_is_a_failure() {
    let (session, _inference) =
        session(ScriptedInference::new().reply("죄송합니다, 식단을 만들 수 없습니다."));
    fill_profile(&session);

    let outcome = session.generate_plan().await;

    match outcome {
        TriggerOutcome::Failed(WorkflowError::Parse(failure)) => {
            assert_eq!(failure.raw, "죄송합니다, 식단을 만들 수 없습니다.");
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
    assert_eq!(
        session.notice_text(View::MealPlan),
        Some("식단 생성 중 오류가 발생했습니다.")
    );
}

#[tokio::test]
async fn trigger_while_generating_is_ignored() {
    let (inference, gate) = ScriptedInference::gated();
    let (session, inference) = session(inference.reply(MEAL_PLAN_REPLY));
    fill_profile(&session);

    let (first, second, ()) = tokio::join!(session.generate_plan(), session.generate_plan(), async {
        tokio::task::yield_now().await;
        assert!(session.is_generating());
        gate.add_permits(1);
    });

    assert!(first.is_completed(), "got {first:?}");
    assert!(matches!(second, TriggerOutcome::Ignored));
    assert_eq!(inference.calls(), 1);
    assert_eq!(session.meal_plan().snapshot().runs, 1);
}

#[tokio::test]
async fn dropped_run_releases_busy_phase() {
    let (inference, _gate) = ScriptedInference::gated();
    let (session, _inference) = session(inference);
    fill_profile(&session);

    let abandoned = tokio::time::timeout(Duration::from_millis(20), session.generate_plan()).await;

    assert!(abandoned.is_err());
    assert!(!session.is_generating());
    assert_eq!(session.meal_plan().snapshot().phase, MealPlanPhase::Idle);
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verify_without_image_makes_no_call() {
    let (session, inference) = session(ScriptedInference::new());

    let outcome = session.verify_plate().await;

    assert!(matches!(
        outcome,
        TriggerOutcome::Rejected(ValidationFailure::MissingImage)
    ));
    assert_eq!(inference.calls(), 0);
    let snapshot = session.verification().snapshot();
    assert_eq!(snapshot.phase, VerificationPhase::NoImage);
    assert_eq!(
        session.notice_text(View::Verification),
        Some("이미지를 먼저 업로드해주세요.")
    );
}

#[tokio::test]
async fn clean_plate_is_verified() {
    let (session, inference) = session(ScriptedInference::new().reply(CLEAN_PLATE_REPLY));
    session
        .select_image_bytes(JPEG, Some("plate.jpg"))
        .expect("jpeg accepted");
    assert_eq!(
        session.verification().snapshot().phase,
        VerificationPhase::ImageSelected
    );

    let outcome = session.verify_plate().await;

    assert!(outcome.is_completed(), "got {outcome:?}");
    let request = &inference.requests()[0];
    let image = request.image.as_ref().expect("image attached");
    assert_eq!(image.mime_type, "image/jpeg");
    assert!(image.data.starts_with("/9j/"));

    let snapshot = session.verification().snapshot();
    assert_eq!(snapshot.phase, VerificationPhase::Verified);
    let result = snapshot.result.expect("result published");
    assert!(result.clean_plate);
    assert!((result.score - 95.0).abs() < f64::EPSILON);
    assert_eq!(result.used_dishes, vec!["밥그릇", "국그릇"]);
}

#[tokio::test]
async fn new_image_clears_result() {
    let (session, _inference) = session(ScriptedInference::new().reply(CLEAN_PLATE_REPLY));
    session.select_image_bytes(JPEG, None).expect("jpeg");
    assert!(session.verify_plate().await.is_completed());

    session.select_image_bytes(PNG, None).expect("png");

    let snapshot = session.verification().snapshot();
    assert_eq!(snapshot.phase, VerificationPhase::ImageSelected);
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.image.expect("image").mime_type(), "image/png");
    assert_eq!(snapshot.epoch, 2);
}

#[tokio::test]
async fn reply_for_replaced_image_is_discarded() {
    let (inference, gate) = ScriptedInference::gated();
    let (session, inference) = session(inference.reply(CLEAN_PLATE_REPLY));
    session.select_image_bytes(JPEG, None).expect("jpeg");

    let (outcome, ()) = tokio::join!(session.verify_plate(), async {
        tokio::task::yield_now().await;
        assert!(session.is_verifying());
        session.select_image_bytes(PNG, None).expect("png");
        assert_eq!(
            session.verification().snapshot().phase,
            VerificationPhase::Verifying
        );
        gate.add_permits(1);
    });

    assert!(matches!(outcome, TriggerOutcome::Superseded), "got {outcome:?}");
    let snapshot = session.verification().snapshot();
    assert_eq!(snapshot.phase, VerificationPhase::ImageSelected);
    assert!(snapshot.result.is_none());

    inference.push_reply(CLEAN_PLATE_REPLY);
    gate.add_permits(1);
    assert!(session.verify_plate().await.is_completed());
    let request = inference.requests().pop().expect("second request");
    assert_eq!(request.image.expect("image").mime_type, "image/png");
}

#[tokio::test]
async fn verification_failure_sets_notice() {
    let (session, _inference) =
        session(ScriptedInference::new().fail(LlmError::Timeout(30_000)));
    session.select_image_bytes(JPEG, None).expect("jpeg");

    let outcome = session.verify_plate().await;

    assert!(matches!(
        outcome,
        TriggerOutcome::Failed(WorkflowError::Inference(LlmError::Timeout(30_000)))
    ));
    let snapshot = session.verification().snapshot();
    assert_eq!(snapshot.phase, VerificationPhase::Failed);
    assert_eq!(snapshot.notice, Some(Notice::VerificationFailed));
    assert!(snapshot.image.is_some());
    assert!(!session.is_verifying());
}

#[tokio::test]
async fn workflows_run_concurrently() {
    let (inference, gate) = ScriptedInference::gated();
    let (session, inference) = session(inference.reply(MEAL_PLAN_REPLY).reply(CLEAN_PLATE_REPLY));
    fill_profile(&session);
    session.select_image_bytes(JPEG, None).expect("jpeg");

    let (plan, plate, ()) = tokio::join!(session.generate_plan(), session.verify_plate(), async {
        tokio::task::yield_now().await;
        assert!(session.is_generating());
        assert!(session.is_verifying());
        gate.add_permits(2);
    });

    assert!(plan.is_completed(), "got {plan:?}");
    assert!(plate.is_completed(), "got {plate:?}");
    assert_eq!(inference.calls(), 2);
}
