mod support;

use futures_util::SinkExt;
use support::*;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn when_client_connects_then_identity_map_and_roster_arrive_in_order() {
    let url = start_server().await;
    let mut client = connect(&url).await;

    let identity = expect_type(&mut client, "Identity").await;
    let id = identity["data"]["player_id"]
        .as_str()
        .expect("player id")
        .to_owned();
    assert_eq!(id.len(), 20);

    let map = expect_type(&mut client, "MapData").await;
    assert_eq!(map["data"]["width"], 800.0);
    assert_eq!(map["data"]["obstacles"][0]["type"], "home");

    let roster = expect_type(&mut client, "CurrentPlayers").await;
    let me = &roster["data"][id.as_str()];
    assert_eq!(me["kills"], 0);
    let letter = id[..1].to_uppercase();
    assert_eq!(me["letter"], letter.as_str());
    let (x, y) = (me["x"].as_f64().expect("x"), me["y"].as_f64().expect("y"));
    assert!((20.0..=780.0).contains(&x) && (20.0..=580.0).contains(&y));
}

#[tokio::test]
async fn when_second_client_joins_then_both_learn_about_each_other() {
    let url = start_server().await;
    let (mut a, a_id) = join(&url).await;

    let mut b = connect(&url).await;
    let identity = expect_type(&mut b, "Identity").await;
    let b_id = identity["data"]["player_id"].as_str().expect("id").to_owned();
    expect_type(&mut b, "MapData").await;
    let roster = expect_type(&mut b, "CurrentPlayers").await;
    let roster = roster["data"].as_object().expect("roster object");
    assert_eq!(roster.len(), 2);
    assert!(roster.contains_key(&a_id) && roster.contains_key(&b_id));

    let joined = expect_type(&mut a, "NewPlayer").await;
    assert_eq!(joined["data"]["id"], b_id.as_str());
}

#[tokio::test]
async fn when_player_moves_then_only_others_hear_about_valid_moves() {
    let url = start_server().await;
    let (mut a, a_id) = join(&url).await;
    let (mut b, _) = join(&url).await;
    expect_type(&mut a, "NewPlayer").await;

    // Inside the corner block, then past the right edge.
    move_to(&mut a, 50.0, 50.0).await;
    move_to(&mut a, 790.0, 300.0).await;
    move_to(&mut a, 400.0, 300.0).await;

    let moved = expect_type(&mut b, "PlayerMoved").await;
    assert_eq!(moved["data"]["id"], a_id.as_str());
    assert_eq!(moved["data"]["x"], 400.0);
    assert_eq!(moved["data"]["y"], 300.0);

    // The mover's next message is its own shot, not an echo of the move.
    shoot(&mut a, 400.0, 300.0).await;
    let fired = expect_type(&mut a, "BulletFired").await;
    assert_eq!(fired["data"]["owner"], a_id.as_str());
    expect_type(&mut b, "BulletFired").await;
}

#[tokio::test]
async fn when_hit_is_reported_then_victim_is_killed_and_respawns() {
    let url = start_server().await;
    let (mut a, a_id) = join(&url).await;
    let (mut b, b_id) = join(&url).await;
    expect_type(&mut a, "NewPlayer").await;

    shoot(&mut a, 400.0, 300.0).await;
    let fired = expect_type(&mut a, "BulletFired").await;
    let bullet_id = fired["data"]["id"].as_u64().expect("bullet id");
    expect_type(&mut b, "BulletFired").await;

    report_hit(&mut a, bullet_id, &b_id).await;

    let kill = expect_type(&mut b, "PlayerKilled").await;
    assert_eq!(kill["data"]["killer"], a_id.as_str());
    assert_eq!(kill["data"]["victim"], b_id.as_str());
    assert_eq!(kill["data"]["kills"], 1);
    expect_type(&mut b, "Killed").await;
    let removed = expect_type(&mut b, "RemovePlayer").await;
    assert_eq!(removed["data"], b_id.as_str());

    let kill = expect_type(&mut a, "PlayerKilled").await;
    assert_eq!(kill["data"]["kills"], 1);
    expect_type(&mut a, "RemovePlayer").await;

    let back = expect_type(&mut b, "NewPlayer").await;
    assert_eq!(back["data"]["id"], b_id.as_str());
    let roster = expect_type(&mut b, "CurrentPlayers").await;
    assert_eq!(roster["data"][a_id.as_str()]["kills"], 1);

    let back = expect_type(&mut a, "NewPlayer").await;
    assert_eq!(back["data"]["id"], b_id.as_str());
}

#[tokio::test]
async fn when_killed_player_scores_later_then_its_kills_survive_respawns() {
    let url = start_server().await;
    let (mut a, a_id) = join(&url).await;
    let (mut b, b_id) = join(&url).await;
    expect_type(&mut a, "NewPlayer").await;

    // b kills a first.
    shoot(&mut b, 400.0, 300.0).await;
    let bullet = expect_type(&mut b, "BulletFired").await["data"]["id"]
        .as_u64()
        .expect("bullet id");
    expect_type(&mut a, "BulletFired").await;
    report_hit(&mut b, bullet, &a_id).await;
    expect_type(&mut a, "PlayerKilled").await;
    expect_type(&mut a, "Killed").await;
    expect_type(&mut a, "RemovePlayer").await;
    expect_type(&mut a, "NewPlayer").await;
    expect_type(&mut a, "CurrentPlayers").await;
    expect_type(&mut b, "PlayerKilled").await;
    expect_type(&mut b, "RemovePlayer").await;
    expect_type(&mut b, "NewPlayer").await;

    // Then a kills b; b keeps the kill it scored before dying.
    shoot(&mut a, 400.0, 300.0).await;
    let bullet = expect_type(&mut a, "BulletFired").await["data"]["id"]
        .as_u64()
        .expect("bullet id");
    expect_type(&mut b, "BulletFired").await;
    report_hit(&mut a, bullet, &b_id).await;
    expect_type(&mut b, "PlayerKilled").await;
    expect_type(&mut b, "Killed").await;
    expect_type(&mut b, "RemovePlayer").await;

    let back = expect_type(&mut b, "NewPlayer").await;
    assert_eq!(back["data"]["id"], b_id.as_str());
    assert_eq!(back["data"]["kills"], 1);
}

#[tokio::test]
async fn when_victim_reports_its_own_death_then_it_is_eliminated() {
    let url = start_server().await;
    let (mut a, _) = join(&url).await;
    let (mut b, b_id) = join(&url).await;
    expect_type(&mut a, "NewPlayer").await;

    shoot(&mut a, 400.0, 300.0).await;
    expect_type(&mut a, "BulletFired").await;
    let bullet = expect_type(&mut b, "BulletFired").await["data"]["id"]
        .as_u64()
        .expect("bullet id");

    // Only the victim's client reports the hit.
    report_hit(&mut b, bullet, &b_id).await;

    let kill = expect_type(&mut b, "PlayerKilled").await;
    assert_eq!(kill["data"]["victim"], b_id.as_str());
    expect_type(&mut b, "Killed").await;
    let removed = expect_type(&mut b, "RemovePlayer").await;
    assert_eq!(removed["data"], b_id.as_str());

    expect_type(&mut a, "PlayerKilled").await;
    let removed = expect_type(&mut a, "RemovePlayer").await;
    assert_eq!(removed["data"], b_id.as_str());

    let back = expect_type(&mut b, "NewPlayer").await;
    assert_eq!(back["data"]["id"], b_id.as_str());
}

#[tokio::test]
async fn when_client_disconnects_then_others_see_it_removed() {
    let url = start_server().await;
    let (mut a, _) = join(&url).await;
    let (mut b, b_id) = join(&url).await;
    expect_type(&mut a, "NewPlayer").await;

    b.close(None).await.expect("close handshake");

    let removed = expect_type(&mut a, "RemovePlayer").await;
    assert_eq!(removed["data"], b_id.as_str());
}

#[tokio::test]
async fn when_input_is_malformed_then_session_stays_open() {
    let url = start_server().await;
    let (mut a, a_id) = join(&url).await;

    send_text(&mut a, "not json").await;
    send_text(&mut a, r#"{"type":"PlayerMovement","data":{"x":"a","y":1}}"#).await;
    send_text(
        &mut a,
        r#"{"type":"Shoot","data":{"x":1,"y":1,"direction":{"x":0,"y":0}}}"#,
    )
    .await;
    send_text(&mut a, r#"{"type":"BulletHit","data":{"bullet_id":1,"target_id":""}}"#).await;
    a.send(Message::Binary(vec![1, 2, 3].into()))
        .await
        .expect("send binary");

    shoot(&mut a, 400.0, 300.0).await;
    let fired = expect_type(&mut a, "BulletFired").await;
    assert_eq!(fired["data"]["owner"], a_id.as_str());
    assert_eq!(fired["data"]["direction"]["x"], 1.0);
}
