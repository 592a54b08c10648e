use std::time::Duration;

use async_trait::async_trait;
use barrage_content::ContentFactory;
use barrage_core::{
    AmmoId, ArbitrationRequest, ArbitrationResponse, AttackDeclaration, EntityId, Hex,
    LockSelection, Phase, ResolutionOutcome, TagDesignation, TargetSpec, TeamId, UnitView,
    WeaponId,
};
use barrage_runtime::{
    ArbitrationProvider, Battlefield, FixedChoiceProvider, Runtime, RuntimeConfig,
};

const FIRER: EntityId = EntityId(1);
const NEAR: EntityId = EntityId(2);
const FAR: EntityId = EntityId(4);
const TAGGER: EntityId = EntityId(5);
const COPPERHEAD: AmmoId = AmmoId(3);

struct SlowProvider;

#[async_trait]
impl ArbitrationProvider for SlowProvider {
    async fn choose(&self, _request: &ArbitrationRequest) -> ArbitrationResponse {
        tokio::time::sleep(Duration::from_secs(5)).await;
        ArbitrationResponse::Chosen(0)
    }
}

struct GoneProvider;

#[async_trait]
impl ArbitrationProvider for GoneProvider {
    async fn choose(&self, _request: &ArbitrationRequest) -> ArbitrationResponse {
        ArbitrationResponse::Disconnected
    }
}

fn battlefield() -> Battlefield {
    let mut field = Battlefield::new(16, 17);
    // Gunnery 0 with guidance keeps every shot an automatic hit.
    field.add_unit(UnitView::new(FIRER, TeamId(0), None).with_skills(0, 0), 50);
    field.add_unit(
        UnitView::new(TAGGER, TeamId(0), Some(Hex::new(2, 2))).with_skills(4, 4),
        30,
    );
    field.add_unit(
        UnitView::new(NEAR, TeamId(1), Some(Hex::new(8, 8))).with_skills(4, 4),
        100,
    );
    field.add_unit(
        UnitView::new(FAR, TeamId(1), Some(Hex::new(9, 8))).with_skills(4, 4),
        100,
    );
    field
}

fn runtime(provider: impl ArbitrationProvider + 'static) -> Runtime {
    let munitions = ContentFactory::bundled()
        .load_munitions()
        .expect("bundled catalog loads");
    Runtime::builder()
        .config(RuntimeConfig {
            session_seed: 11,
            arbitration_timeout: Duration::from_millis(50),
            ..RuntimeConfig::default()
        })
        .battlefield(battlefield())
        .munitions(munitions)
        .arbitration(provider)
        .build()
        .expect("runtime builds")
}

fn designate(runtime: &mut Runtime, target: EntityId) {
    let turn = runtime.turn();
    runtime.record_designation(TagDesignation {
        tagger: TAGGER,
        team: TeamId(0),
        target: TargetSpec::Entity(target),
        hit: true,
        turn,
    });
}

fn copperhead() -> AttackDeclaration {
    AttackDeclaration::new(
        FIRER,
        WeaponId(1),
        COPPERHEAD,
        TargetSpec::Hex(Hex::new(8, 8)),
        Hex::ORIGIN,
    )
    .with_modifier("guidance", -2)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_provider_falls_back_to_lowest_unit_id() {
    let mut runtime = runtime(SlowProvider);
    designate(&mut runtime, FAR);
    designate(&mut runtime, NEAR);
    let attack = runtime.declare_attack(copperhead()).unwrap();

    let report = runtime.resolve(attack, Phase::Firing).await.unwrap();

    let lock = report.homing.expect("round locked on");
    assert_eq!(
        lock.selection,
        LockSelection::SafeDefault(ArbitrationResponse::TimedOut)
    );
    assert_eq!(lock.candidate.target, TargetSpec::Entity(NEAR));
    assert_eq!(report.outcome, ResolutionOutcome::Hit);
    assert_eq!(
        runtime.battlefield().unit_record(NEAR).unwrap().damage,
        20
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disconnected_provider_takes_the_safe_default() {
    let mut runtime = runtime(GoneProvider);
    designate(&mut runtime, FAR);
    designate(&mut runtime, NEAR);
    let attack = runtime.declare_attack(copperhead()).unwrap();

    let report = runtime.resolve(attack, Phase::Firing).await.unwrap();

    let lock = report.homing.unwrap();
    assert_eq!(
        lock.selection,
        LockSelection::SafeDefault(ArbitrationResponse::Disconnected)
    );
    assert_eq!(lock.candidate.target, TargetSpec::Entity(NEAR));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn provider_choice_redirects_the_round() {
    let mut runtime = runtime(FixedChoiceProvider(0));
    designate(&mut runtime, FAR);
    designate(&mut runtime, NEAR);
    let attack = runtime.declare_attack(copperhead()).unwrap();

    let report = runtime.resolve(attack, Phase::Firing).await.unwrap();

    let lock = report.homing.unwrap();
    assert_eq!(lock.selection, LockSelection::Arbitrated(0));
    assert_eq!(lock.candidate.target, TargetSpec::Entity(FAR));
    assert_eq!(lock.original_hex, Hex::new(8, 8));
    assert_eq!(runtime.battlefield().unit_record(FAR).unwrap().damage, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn designations_expire_with_the_turn() {
    let mut runtime = runtime(FixedChoiceProvider(0));
    designate(&mut runtime, NEAR);
    runtime.begin_turn();
    runtime.tick_targeting_phase().unwrap();
    let attack = runtime.declare_attack(copperhead()).unwrap();

    let report = runtime.resolve(attack, Phase::Firing).await.unwrap();

    assert!(matches!(
        report.outcome,
        ResolutionOutcome::Impossible { .. }
    ));
    assert!(report.homing.is_none());
    assert_eq!(runtime.battlefield().unit_record(NEAR).unwrap().damage, 0);
}
