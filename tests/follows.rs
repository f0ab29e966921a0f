//! Follow/unfollow idempotence, the self-follow no-op, and following-feed
//! membership.

mod common;

use actix_web::test;
use gazette::db;
use serde_json::Value;

#[actix_web::test]
async fn follow_creates_one_edge_and_redirects_to_profile() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let alice = common::user(&ctx, "alice").await;
    let bob = common::user(&ctx, "bob").await;

    let req = common::as_user(
        test::TestRequest::get().uri("/profile/alice/follow/"),
        &bob,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(common::location(&resp), "/profile/alice/");

    assert!(db::follows::exists(&ctx.pool, bob.id, alice.id).await.unwrap());
    assert_eq!(db::follows::count_for_user(&ctx.pool, bob.id).await.unwrap(), 1);
}

#[actix_web::test]
async fn following_twice_leaves_exactly_one_edge() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let alice = common::user(&ctx, "alice").await;
    let bob = common::user(&ctx, "bob").await;

    for _ in 0..2 {
        let req = common::as_user(
            test::TestRequest::get().uri("/profile/alice/follow/"),
            &bob,
        );
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 302);
    }

    assert_eq!(db::follows::count_for_user(&ctx.pool, bob.id).await.unwrap(), 1);
}

#[actix_web::test]
async fn unfollow_is_idempotent() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let alice = common::user(&ctx, "alice").await;
    let bob = common::user(&ctx, "bob").await;
    common::follow(&ctx, &bob, &alice).await;

    for _ in 0..2 {
        let req = common::as_user(
            test::TestRequest::get().uri("/profile/alice/unfollow/"),
            &bob,
        );
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(common::location(&resp), "/profile/alice/");
    }

    assert_eq!(db::follows::count_for_user(&ctx.pool, bob.id).await.unwrap(), 0);
}

#[actix_web::test]
async fn self_follow_is_a_silent_no_op() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let alice = common::user(&ctx, "alice").await;

    let req = common::as_user(
        test::TestRequest::get().uri("/profile/alice/follow/"),
        &alice,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(
        db::follows::count_for_user(&ctx.pool, alice.id).await.unwrap(),
        0
    );
}

#[actix_web::test]
async fn following_an_unknown_author_is_404() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let alice = common::user(&ctx, "alice").await;

    let req = common::as_user(
        test::TestRequest::get().uri("/profile/nobody/follow/"),
        &alice,
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn follow_routes_require_login() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    common::user(&ctx, "alice").await;

    for uri in ["/profile/alice/follow/", "/profile/alice/unfollow/", "/follow/"] {
        let resp =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), 302);
        assert_eq!(
            common::location(&resp),
            format!("/auth/login/?next={uri}")
        );
    }
}

#[actix_web::test]
async fn following_feed_shows_followed_authors_only() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let reader = common::user(&ctx, "reader").await;
    let followed = common::user(&ctx, "followed").await;
    let stranger = common::user(&ctx, "stranger").await;

    common::post(&ctx, &followed, None, "from someone I follow").await;
    common::post(&ctx, &stranger, None, "from a stranger").await;
    common::follow(&ctx, &reader, &followed).await;

    let req = common::as_user(test::TestRequest::get().uri("/follow/"), &reader);
    let resp = test::call_service(&app, req.to_request()).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    let items = body["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "from someone I follow");
    assert_eq!(body["following_view"], true);
}

#[actix_web::test]
async fn following_feed_is_empty_for_non_followers() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let reader = common::user(&ctx, "reader").await;
    let author = common::user(&ctx, "author").await;
    common::post(&ctx, &author, None, "unseen").await;

    let req = common::as_user(test::TestRequest::get().uri("/follow/"), &reader);
    let resp = test::call_service(&app, req.to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page"]["items"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn unfollow_removes_posts_from_the_feed() {
    let ctx = common::setup().await;
    let app = common::service(&ctx).await;
    let reader = common::user(&ctx, "reader").await;
    let author = common::user(&ctx, "author").await;
    common::post(&ctx, &author, None, "here today").await;
    common::follow(&ctx, &reader, &author).await;

    let req = common::as_user(
        test::TestRequest::get().uri("/profile/author/unfollow/"),
        &reader,
    );
    test::call_service(&app, req.to_request()).await;

    let req = common::as_user(test::TestRequest::get().uri("/follow/"), &reader);
    let resp = test::call_service(&app, req.to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["page"]["items"].as_array().unwrap().len(), 0);
}
