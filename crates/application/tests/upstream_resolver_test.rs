mod helpers;

use ferrous_route_domain::{DomainError, Question, RecordType, ResponseCode};
use helpers::*;
use std::sync::Arc;
use std::time::Duration;

fn question(name: &str) -> Question {
    Question::new(name, RecordType::A)
}

// ── leaves ─────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_leaf_returns_all_messages_merged() {
    let transport = Arc::new(MockTransport::new());
    transport.on_any(
        &server(1),
        Script::Reply {
            delay: Duration::from_millis(10),
            messages: vec![
                answer(vec![a_record("example.com", [1, 1, 1, 1])]),
                answer(vec![a_record("example.com", [2, 2, 2, 2])]),
            ],
        },
    );
    let resolver = resolver(transport, leaf(1));

    let partial = resolver.lookup(&question("example.com")).await.unwrap();

    assert_eq!(partial.sections.answer.len(), 2);
    assert_eq!(partial.sections.answer[0].data.as_bytes(), &[1, 1, 1, 1]);
    assert_eq!(partial.sections.answer[1].data.as_bytes(), &[2, 2, 2, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_leaf_times_out() {
    let transport = Arc::new(MockTransport::new());
    transport.on_any(&server(1), Script::Hang);
    let resolver = resolver(transport, leaf(1));

    let err = resolver.lookup(&question("example.com")).await.unwrap_err();

    assert!(matches!(err, DomainError::TransportTimeout { ref server } if server == "10.0.0.1:53"));
}

#[tokio::test(start_paused = true)]
async fn test_leaf_without_messages_fails() {
    let transport = Arc::new(MockTransport::new());
    transport.on_any(
        &server(1),
        Script::Reply {
            delay: Duration::ZERO,
            messages: vec![],
        },
    );
    let resolver = resolver(transport, leaf(1));

    let err = resolver.lookup(&question("example.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidDnsResponse(_)));
}

#[tokio::test(start_paused = true)]
async fn test_upstream_rcode_is_kept() {
    let transport = Arc::new(MockTransport::new());
    let mut nx = answer(vec![]);
    nx.rcode = ResponseCode::NXDomain;
    transport.on_any(&server(1), Script::reply(5, nx));
    let resolver = resolver(transport, leaf(1));

    let partial = resolver.lookup(&question("missing.example")).await.unwrap();
    assert_eq!(partial.rcode, ResponseCode::NXDomain);
}

// ── racing groups ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_group_falls_back_to_successful_branch() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_any(&server(1), Script::fail(5))
        .on_any(
            &server(2),
            Script::reply(50, answer(vec![a_record("example.com", [9, 9, 9, 9])])),
        );
    let resolver = resolver(transport, group(vec![leaf(1), leaf(2)]));

    let partial = resolver.lookup(&question("example.com")).await.unwrap();

    assert_eq!(partial.sections.answer[0].data.as_bytes(), &[9, 9, 9, 9]);
}

#[tokio::test(start_paused = true)]
async fn test_group_survives_timed_out_branch() {
    let transport = Arc::new(MockTransport::new());
    transport.on_any(&server(1), Script::Hang).on_any(
        &server(2),
        Script::reply(4000, answer(vec![a_record("example.com", [2, 2, 2, 2])])),
    );
    let resolver = resolver(transport, group(vec![leaf(1), leaf(2)]));

    let partial = resolver.lookup(&question("example.com")).await.unwrap();
    assert_eq!(partial.sections.answer.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_first_success_wins() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_any(
            &server(1),
            Script::reply(300, answer(vec![a_record("example.com", [1, 1, 1, 1])])),
        )
        .on_any(
            &server(2),
            Script::reply(20, answer(vec![a_record("example.com", [2, 2, 2, 2])])),
        );
    let resolver = resolver(transport, group(vec![leaf(1), leaf(2)]));

    let partial = resolver.lookup(&question("example.com")).await.unwrap();
    assert_eq!(partial.sections.answer[0].data.as_bytes(), &[2, 2, 2, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_losing_branches_are_cancelled() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_any(&server(1), Script::reply(10, answer(vec![])))
        .on_any(&server(2), Script::reply(1000, answer(vec![])));
    let resolver = resolver(transport.clone(), group(vec![leaf(1), leaf(2)]));

    resolver.lookup(&question("example.com")).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(transport.calls().len(), 2);
    assert_eq!(transport.completed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_group_exhaustion_aggregates_every_error() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_any(&server(1), Script::fail(5))
        .on_any(&server(2), Script::Hang)
        .on_any(&server(3), Script::fail(1));
    let resolver = resolver(
        transport,
        group(vec![leaf(1), group(vec![leaf(2), leaf(3)])]),
    );

    let err = resolver.lookup(&question("example.com")).await.unwrap_err();

    let DomainError::AllUpstreamsFailed { errors } = err else {
        panic!("expected aggregate error");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| matches!(e, DomainError::TransportError { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, DomainError::AllUpstreamsFailed { errors } if errors.len() == 2)));
}

#[tokio::test(start_paused = true)]
async fn test_nested_group_success_propagates() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on_any(&server(1), Script::fail(1))
        .on_any(&server(2), Script::fail(2))
        .on_any(
            &server(3),
            Script::reply(30, answer(vec![a_record("example.com", [3, 3, 3, 3])])),
        );
    let resolver = resolver(
        transport,
        group(vec![leaf(1), group(vec![leaf(2), group(vec![leaf(3)])])]),
    );

    let partial = resolver.lookup(&question("example.com")).await.unwrap();
    assert_eq!(partial.sections.answer[0].data.as_bytes(), &[3, 3, 3, 3]);
}

#[tokio::test]
async fn test_empty_topology_has_no_servers() {
    let resolver = resolver(Arc::new(MockTransport::new()), group(vec![]));

    let err = resolver.lookup(&question("example.com")).await.unwrap_err();
    assert!(matches!(err, DomainError::NoUpstreamServers));
}

#[tokio::test]
async fn test_resolving_empty_group_fails_with_no_branches() {
    let resolver = resolver(Arc::new(MockTransport::new()), group(vec![leaf(1)]));
    let empty = group(vec![]);

    let err = resolver
        .resolve(&question("example.com"), &empty)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AllUpstreamsFailed { ref errors } if errors.is_empty()));
}

// ── proxy_request / lookup_into ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_proxy_request_merges_in_question_order() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on(
            &server(1),
            "first.example",
            Script::reply(500, answer(vec![a_record("first.example", [1, 0, 0, 1])])),
        )
        .on(
            &server(1),
            "second.example",
            Script::reply(10, answer(vec![a_record("second.example", [1, 0, 0, 2])])),
        );
    let resolver = resolver(transport, leaf(1));
    let request = request(&["first.example", "second.example"]);
    let (mut response, _rx) = response_for(&request);

    resolver.proxy_request(&request, &mut response).await.unwrap();

    assert_eq!(
        answer_names(&response.sections),
        vec!["first.example", "second.example"]
    );
    assert!(!response.is_sent());
}

#[tokio::test(start_paused = true)]
async fn test_proxy_request_resolves_questions_concurrently() {
    let transport = Arc::new(MockTransport::new());
    transport.on_any(&server(1), Script::reply(1000, answer(vec![])));
    let resolver = resolver(transport, leaf(1));
    let request = request(&["a.example", "b.example", "c.example"]);
    let (mut response, _rx) = response_for(&request);

    let start = tokio::time::Instant::now();
    resolver.proxy_request(&request, &mut response).await.unwrap();

    assert!(start.elapsed() < Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_proxy_request_takes_first_non_noerror_rcode() {
    let transport = Arc::new(MockTransport::new());
    let mut refused = answer(vec![]);
    refused.rcode = ResponseCode::Refused;
    let mut nx = answer(vec![]);
    nx.rcode = ResponseCode::NXDomain;
    transport
        .on(&server(1), "ok.example", Script::reply(1, answer(vec![])))
        .on(&server(1), "nx.example", Script::reply(50, nx))
        .on(&server(1), "refused.example", Script::reply(5, refused));
    let resolver = resolver(transport, leaf(1));
    let request = request(&["ok.example", "nx.example", "refused.example"]);
    let (mut response, _rx) = response_for(&request);

    resolver.proxy_request(&request, &mut response).await.unwrap();

    assert_eq!(response.rcode, ResponseCode::NXDomain);
}

#[tokio::test(start_paused = true)]
async fn test_proxy_request_failure_leaves_response_untouched() {
    let transport = Arc::new(MockTransport::new());
    transport
        .on(
            &server(1),
            "ok.example",
            Script::reply(1, answer(vec![a_record("ok.example", [1, 2, 3, 4])])),
        )
        .on(&server(1), "bad.example", Script::fail(1));
    let resolver = resolver(transport, leaf(1));
    let request = request(&["ok.example", "bad.example"]);
    let (mut response, _rx) = response_for(&request);

    assert!(resolver.proxy_request(&request, &mut response).await.is_err());
    assert!(response.sections.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lookup_into_appends_to_existing_records() {
    let transport = Arc::new(MockTransport::new());
    transport.on_any(
        &server(1),
        Script::reply(1, answer(vec![a_record("extra.example", [5, 5, 5, 5])])),
    );
    let resolver = resolver(transport, leaf(1));
    let request = request(&["example.com"]);
    let (mut response, _rx) = response_for(&request);
    response
        .sections
        .answer
        .push(a_record("example.com", [4, 4, 4, 4]));

    resolver
        .lookup_into(&question("extra.example"), &mut response)
        .await
        .unwrap();

    assert_eq!(
        answer_names(&response.sections),
        vec!["example.com", "extra.example"]
    );
}
